//! 1 行入力の Outbound ポート

use common::error::Error;

/// プロンプトを出して 1 行読む
pub trait LineReader {
    /// 読んだ行（末尾の改行は除く）。入力が終わっていれば `Ok(None)`。
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error>;
}
