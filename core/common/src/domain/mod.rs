//! ドメイン型
//!
//! 会話メッセージと図（Diagram）。String を直接運ばず、意味のある型に包んで境界を明確にする。

pub mod diagram;

use serde::{Deserialize, Serialize};

pub use diagram::{Diagram, DiagramFormat};

/// メッセージの発言者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// 文字列から解析（大文字小文字を区別しない。"ai" は assistant の別名）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" | "human" => Some(Role::User),
            "assistant" | "ai" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 会話メッセージ（履歴ストアに入った時点で前後の空白は除去済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// 前後の空白を除去したコピー
    pub fn trimmed(&self) -> Self {
        Self::new(self.role, self.content.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse(" Assistant "), Some(Role::Assistant));
        assert_eq!(Role::parse("ai"), Some(Role::Assistant));
        assert_eq!(Role::parse("SYSTEM"), Some(Role::System));
        assert_eq!(Role::parse("tool"), None);
    }

    #[test]
    fn test_message_trimmed() {
        let msg = Message::user("  Hello\n");
        let t = msg.trimmed();
        assert_eq!(t.content, "Hello");
        assert_eq!(t.role, Role::User);
        // 元は変わらない
        assert_eq!(msg.content, "  Hello\n");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
