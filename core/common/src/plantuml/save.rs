//! 図の保存
//!
//! ファイル名は `diagram_<YYYYMMDD_HHMMSS>_<8桁hex>_<連番>.<拡張子>`。
//! タイムスタンプは 1 回の保存で共通、hex はファイルごとに乱数なので同一秒の呼び出しでも衝突しない。

use crate::domain::Diagram;
use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 図をディレクトリへ書き出す
pub struct DiagramWriter {
    fs: Arc<dyn FileSystem>,
    logger: Arc<dyn Log>,
}

impl DiagramWriter {
    pub fn new(fs: Arc<dyn FileSystem>, logger: Arc<dyn Log>) -> Self {
        Self { fs, logger }
    }

    /// 図を保存し、入力と同じ順でパスを返す。ディレクトリは無ければ作る。
    pub fn save(&self, diagrams: &[Diagram], directory: &Path) -> Result<Vec<PathBuf>, Error> {
        self.fs.create_dir_all(directory)?;
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut saved = Vec::with_capacity(diagrams.len());
        for (i, diagram) in diagrams.iter().enumerate() {
            let path = directory.join(file_name(&timestamp, &short_hex(), i + 1, diagram));
            self.fs.write_bytes(&path, &diagram.data)?;
            let _ = self.logger.log(
                &LogRecord::new(LogLevel::Info, "diagram saved")
                    .layer("core")
                    .kind("save")
                    .field("path", path.display().to_string())
                    .field("bytes", diagram.data.len()),
            );
            saved.push(path);
        }
        Ok(saved)
    }
}

fn file_name(timestamp: &str, hex: &str, index: usize, diagram: &Diagram) -> String {
    format!(
        "diagram_{}_{}_{}.{}",
        timestamp,
        hex,
        index,
        diagram.format.extension()
    )
}

/// uuid v4 の先頭 8 桁
fn short_hex() -> String {
    let mut s = uuid::Uuid::new_v4().simple().to_string();
    s.truncate(8);
    s
}
