//! ファイルへ JSONL で追記する Log 実装
//!
//! ログの出力先はファイルのみ。ユーザー向けのコンソール表示とは別。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイルへ JSONL を追記する Log 実装
pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileJsonLog {
    /// 親ディレクトリが無ければ初回書き込み時に作成する
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(record).map_err(|e| Error::json(e.to_string()))?;
        line.push('\n');
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(line.as_bytes())?;
        w.flush()?;
        Ok(())
    }
}

/// 何も出力しない Log 実装（ログファイル未指定時・テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}
