//! 言語モデルのトレイト定義

use crate::domain::Message;
use crate::error::Error;

/// 言語モデル（外部の協調コンポーネント）
///
/// ロール付きメッセージ列を受け取り、応答テキストを返す。
/// リトライ・タイムアウトは実装側が `ModelConfig` に従って行う。
pub trait ChatModel {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// メッセージ列を送り、応答本文を返す
    fn invoke(&self, messages: &[Message]) -> Result<String, Error>;
}
