//! umlchat 共通ライブラリ
//!
//! 会話メモリ・PlantUML の抽出/レンダリング/保存・会話エージェントを提供します。
//! `umlchat` コマンドはこれを組み立てて対話ループを回すだけです。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Message / Diagram）
pub mod domain;

/// 上限付きの会話履歴
pub mod memory;

/// PlantUML の抽出・レンダリング・保存
pub mod plantuml;

/// 言語モデル
pub mod llm;

/// 既定のプロンプト
pub mod prompts;

/// 会話エージェント
pub mod agent;

pub mod adapter;
pub mod ports;

pub use agent::ConversationAgent;
pub use error::Error;
pub use memory::ConversationMemory;
