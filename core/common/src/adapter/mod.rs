//! アダプター（ポートの標準実装）
//!
//! core はポートの trait 経由でのみファイル・ログに触れる。
//! 実装は標準実装（Std*）やテスト用のモックを注入する。

pub mod file_json_log;
pub mod std_fs;

pub use crate::ports::outbound::FileSystem;
pub use file_json_log::{FileJsonLog, NoopLog};
pub use std_fs::StdFileSystem;
