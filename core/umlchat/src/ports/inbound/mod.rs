//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::cli::Config;
use common::error::Error;

/// 対話アプリケーションを実行する Inbound ポート
///
/// main の Runner はこの trait を実装した型（ChatApp）の run を呼び出す。
pub trait RunChatApp {
    fn run(&self, config: &Config) -> Result<i32, Error>;
}
