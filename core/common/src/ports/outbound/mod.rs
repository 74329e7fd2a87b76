//! Outbound ポート: core が外界（FS・ログ・モデル・レンダリングサービス・API キー）を使うための trait

pub mod chat_model;
pub mod credential;
pub mod diagram_service;
pub mod fs;
pub mod log;

pub use chat_model::ChatModel;
pub use credential::{resolve_api_key, CredentialSource};
pub use diagram_service::DiagramService;
pub use fs::FileSystem;
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
