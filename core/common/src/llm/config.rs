//! モデル設定
//!
//! エージェントは中身を解釈せず、そのままプロバイダに渡す。

use std::time::Duration;

/// 既定のモデル
pub const DEFAULT_GROQ_MODEL: &str = "gemma2-9b-it";

/// よく使う Groq のテキストモデル（ヘルプ表示用）
pub const GROQ_TEXT_MODELS: &[&str] = &[
    "gemma2-9b-it",
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "mixtral-8x7b-32768",
];

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// モデル呼び出しの設定
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    /// 生成トークン数の上限（None のときはサーバ既定）
    pub max_tokens: Option<u32>,
    /// 1 リクエストのタイムアウト（None のときは無制限）
    pub timeout: Option<Duration>,
    /// 失敗時の追加試行回数
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.model, "gemma2-9b-it");
        assert_eq!(cfg.temperature, 0.2);
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.max_retries, 2);
        assert!(GROQ_TEXT_MODELS.contains(&DEFAULT_GROQ_MODEL));
    }
}
