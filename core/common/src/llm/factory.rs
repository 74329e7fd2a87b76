//! プロバイダファクトリー
//!
//! プロバイダタイプに基づいて適切なモデルを作成します。

use crate::domain::Message;
use crate::error::Error;
use crate::llm::config::ModelConfig;
use crate::llm::echo::EchoModel;
use crate::llm::groq::GroqProvider;
use crate::llm::provider::ChatModel;
use crate::ports::outbound::Log;
use std::sync::Arc;

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderType {
    /// Groq（OpenAI 互換 API）
    #[default]
    Groq,
    /// Echo（モデルを呼ばない）
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Echo => "echo",
        }
    }

    /// API キーが必要か
    pub fn needs_api_key(&self) -> bool {
        matches!(self, Self::Groq)
    }
}

/// モデルの enum ラッパー
pub enum AnyModel {
    Groq(GroqProvider),
    Echo(EchoModel),
}

impl ChatModel for AnyModel {
    fn name(&self) -> &str {
        match self {
            Self::Groq(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn invoke(&self, messages: &[Message]) -> Result<String, Error> {
        match self {
            Self::Groq(p) => p.invoke(messages),
            Self::Echo(p) => p.invoke(messages),
        }
    }
}

/// モデルを作成する
///
/// # Arguments
/// * `provider_type` - プロバイダタイプ
/// * `api_key` - API キー（Groq では必須）
/// * `base_url` - ベース URL（Groq 用。None のときデフォルト）
/// * `config` - モデル設定
/// * `logger` - 呼び出しと再試行の記録先
pub fn create_model(
    provider_type: ProviderType,
    api_key: Option<String>,
    base_url: Option<String>,
    config: ModelConfig,
    logger: Arc<dyn Log>,
) -> Result<AnyModel, Error> {
    match provider_type {
        ProviderType::Groq => {
            let key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| Error::config("GROQ API key is required."))?;
            Ok(AnyModel::Groq(
                GroqProvider::new(key, base_url, config)?.with_logger(logger),
            ))
        }
        ProviderType::Echo => Ok(AnyModel::Echo(EchoModel::new())),
    }
}
