//! API キー取得 Outbound ポート
//!
//! 環境変数・.env ファイル・対話入力のいずれかからキーを得る。組み合わせ方はホスト側が決める。

use crate::error::Error;

/// API キーの取得元
pub trait CredentialSource {
    /// 取得元の名前（ログ用）
    fn name(&self) -> &str;

    /// キーを返す。取得元にキーが無ければ `Ok(None)`。
    fn api_key(&self) -> Result<Option<String>, Error>;
}

/// 取得元を順に試し、空でない最初のキーを返す
pub fn resolve_api_key(sources: &[&dyn CredentialSource], env_key: &str) -> Result<String, Error> {
    for source in sources {
        if let Some(key) = source.api_key()? {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
    }
    Err(Error::config(format!(
        "{} is not set. Add it to a .env file or export it before running.",
        env_key
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl CredentialSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn api_key(&self) -> Result<Option<String>, Error> {
            Ok(self.0.map(|s| s.to_string()))
        }
    }

    struct Failing;

    impl CredentialSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn api_key(&self) -> Result<Option<String>, Error> {
            Err(Error::config("No API key provided."))
        }
    }

    #[test]
    fn test_first_non_empty_wins() {
        let a = Fixed(None);
        let b = Fixed(Some("   "));
        let c = Fixed(Some(" gsk_123 "));
        let d = Fixed(Some("later"));
        let key = resolve_api_key(&[&a, &b, &c, &d], "GROQ_API_KEY").unwrap();
        assert_eq!(key, "gsk_123");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let a = Fixed(None);
        let err = resolve_api_key(&[&a], "GROQ_API_KEY").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("GROQ_API_KEY")));
    }

    #[test]
    fn test_source_error_propagates() {
        let a = Fixed(None);
        let err = resolve_api_key(&[&a, &Failing], "GROQ_API_KEY").unwrap_err();
        assert_eq!(err, Error::config("No API key provided."));
    }
}
