//! Groq プロバイダ（OpenAI Chat Completions 互換 /chat/completions）
//!
//! base_url で任意の互換エンドポイントを指定可能。ストリーミングは使わず 1 回の応答で全文を受け取る。

use crate::adapter::NoopLog;
use crate::domain::Message;
use crate::error::Error;
use crate::llm::config::ModelConfig;
use crate::llm::provider::ChatModel;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// API キーを読む環境変数
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// 再試行の待ち時間（指数バックオフ）
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(4);

/// attempt 回目（1 始まり）の失敗後に待つ時間
pub fn backoff(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(30);
    let ms = (RETRY_BASE_DELAY.as_millis() as u64).saturating_mul(1u64 << shift);
    Duration::from_millis(ms).min(RETRY_MAX_DELAY)
}

/// 1 回の試行の失敗。再試行すべきかを持つ。
struct AttemptError {
    error: Error,
    retryable: bool,
}

/// Groq Chat Completions プロバイダ
pub struct GroqProvider {
    config: ModelConfig,
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    logger: Arc<dyn Log>,
}

impl GroqProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `api_key` - Bearer トークン
    /// * `base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `config` - モデル名・温度・上限・タイムアウト・再試行回数
    pub fn new(api_key: String, base_url: Option<String>, config: ModelConfig) -> Result<Self, Error> {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        // None は無制限（blocking クライアント既定の 30 秒を上書きする）
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::unavailable(format!("Failed to build HTTP client for Groq: {}", e)))?;
        Ok(Self {
            config,
            base_url,
            api_key,
            client,
            logger: Arc::new(NoopLog),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = logger;
        self
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// リクエストペイロードを生成
    pub fn make_request_payload(&self, messages: &[Message]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();
        let mut payload = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "stream": false
        });
        if let Some(max) = self.config.max_tokens {
            payload["max_tokens"] = json!(max);
        }
        payload
    }

    /// レスポンスからテキストを抽出
    pub fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("API error: {}", msg)));
        }

        Ok(v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string()))
    }

    fn attempt(&self, body: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .body(body.to_string())
            .send()
            .map_err(|e| AttemptError {
                error: Error::http(format!("HTTP request failed: {}", e)),
                retryable: true,
            })?;

        let status = response.status();
        let response_text = response.text().map_err(|e| AttemptError {
            error: Error::http(format!("Failed to read response: {}", e)),
            retryable: true,
        })?;

        if !status.is_success() {
            let error_msg = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text));
            return Err(AttemptError {
                error: Error::http(format!("Chat completions error: {}", error_msg)),
                retryable: is_retryable_status(status.as_u16()),
            });
        }

        Ok(response_text)
    }
}

/// 429 と 5xx は時間をおけば通る可能性がある
fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl ChatModel for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn invoke(&self, messages: &[Message]) -> Result<String, Error> {
        let body = serde_json::to_string(&self.make_request_payload(messages))
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let max_attempts = self.config.max_retries + 1;
        let mut attempt = 1;
        let response_text = loop {
            match self.attempt(&body) {
                Ok(text) => break text,
                Err(e) if e.retryable && attempt < max_attempts => {
                    let delay = backoff(attempt);
                    let _ = self.logger.log(
                        &LogRecord::new(LogLevel::Warn, e.error.to_string())
                            .layer("adapter")
                            .kind("model")
                            .field("attempt", attempt)
                            .field("delay_ms", delay.as_millis() as u64),
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e.error),
            }
        };

        self.parse_response_text(&response_text)?
            .ok_or_else(|| Error::json("Model response has no content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(config: ModelConfig) -> GroqProvider {
        GroqProvider::new("test-key".to_string(), None, config).unwrap()
    }

    #[test]
    fn test_payload_carries_config_and_messages() {
        let p = provider(ModelConfig {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.5,
            max_tokens: Some(256),
            ..ModelConfig::default()
        });
        let payload = p.make_request_payload(&[
            Message::system("You are helpful."),
            Message::user("A"),
            Message::assistant("B"),
        ]);
        assert_eq!(payload["model"], "llama-3.1-8b-instant");
        assert_eq!(payload["temperature"], 0.5);
        assert_eq!(payload["max_tokens"], 256);
        assert_eq!(payload["stream"], false);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["content"], "B");
    }

    #[test]
    fn test_payload_omits_max_tokens_when_unset() {
        let payload = provider(ModelConfig::default()).make_request_payload(&[Message::user("x")]);
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let p = GroqProvider::new(
            "k".to_string(),
            Some("http://localhost:8080/v1/".to_string()),
            ModelConfig::default(),
        )
        .unwrap();
        assert_eq!(p.url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(
            provider(ModelConfig::default()).url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_response_text() {
        let p = provider(ModelConfig::default());
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Hello world"}}]}"#;
        assert_eq!(p.parse_response_text(json).unwrap().as_deref(), Some("Hello world"));

        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(p.parse_response_text(json).unwrap(), None);
    }

    #[test]
    fn test_parse_response_error_body() {
        let p = provider(ModelConfig::default());
        let err = p
            .parse_response_text(r#"{"error":{"message":"invalid api key"}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Http(ref m) if m.contains("invalid api key")));
        assert!(matches!(p.parse_response_text("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(backoff(1), Duration::from_millis(250));
        assert_eq!(backoff(2), Duration::from_millis(500));
        assert_eq!(backoff(3), Duration::from_millis(1000));
        assert_eq!(backoff(10), Duration::from_secs(4));
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
    }
}
