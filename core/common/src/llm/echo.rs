//! Echoプロバイダの実装
//!
//! 実際にはモデルを呼ばず、最後のユーザー発言を載せたシーケンス図を返す。
//! API キー無しでの動作確認やテストに使う。

use crate::domain::{Message, Role};
use crate::error::Error;
use crate::llm::provider::ChatModel;

/// Echoプロバイダ
#[derive(Debug, Clone, Default)]
pub struct EchoModel;

impl EchoModel {
    pub fn new() -> Self {
        Self
    }
}

impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    fn invoke(&self, messages: &[Message]) -> Result<String, Error> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");
        // PlantUML の文字列リテラルを壊さないよう改行と引用符を潰す
        let label = last_user.replace(['\n', '\r'], " ").replace('"', "'");
        Ok(format!(
            "[Echo] {} message(s) received.\n\n@startuml\nactor User\nparticipant Echo\nUser -> Echo : \"{}\"\nEcho --> User : echo\n@enduml",
            messages.len(),
            label
        ))
    }
}
