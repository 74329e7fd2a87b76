//! 配線: 標準アダプタで App を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{FileJsonLog, FileSystem, NoopLog, StdFileSystem};
use common::plantuml::PlantUmlServer;
use common::ports::outbound::{DiagramService, Log};

use crate::adapter::{NoopInterruptChecker, SigintChecker, StdConsole, StdinLineReader};
use crate::cli::Config;
use crate::ports::outbound::InterruptChecker;
use crate::usecase::app::ChatApp;

/// ログファイルを指定する環境変数（--log-file が優先）
pub const LOG_FILE_ENV: &str = "UMLCHAT_LOG_FILE";

/// main の Runner が使うもの一式
pub struct App {
    pub logger: Arc<dyn Log>,
    pub chat_app: ChatApp,
}

/// --log-file、次に UMLCHAT_LOG_FILE。どちらも無ければログを捨てる
pub fn wire_logger(fs: &Arc<dyn FileSystem>, log_file: Option<PathBuf>) -> Arc<dyn Log> {
    let path = log_file.or_else(|| {
        std::env::var(LOG_FILE_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    });
    match path {
        Some(p) => Arc::new(FileJsonLog::new(Arc::clone(fs), p)),
        None => Arc::new(NoopLog),
    }
}

/// 配線: 標準入出力・Ctrl+C・PlantUML サーバで App を組み立てる
pub fn wire_umlchat(config: &Config) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let logger = wire_logger(&fs, config.log_file.clone());
    let interrupt: Arc<dyn InterruptChecker> = match SigintChecker::new() {
        Ok(c) => Arc::new(c),
        Err(_) => Arc::new(NoopInterruptChecker::new()),
    };
    let diagram_service =
        PlantUmlServer::from_env().map(|s| Arc::new(s) as Arc<dyn DiagramService>);
    let chat_app = ChatApp::new(
        Arc::clone(&fs),
        Arc::clone(&logger),
        Box::new(StdinLineReader::new()),
        Box::new(StdConsole::new()),
        interrupt,
        diagram_service,
        PathBuf::from("."),
    );
    App { logger, chat_app }
}
