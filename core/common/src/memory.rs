//! 会話メモリ（上限付きの履歴ストア）
//!
//! 追加のたびに上限を適用し、古いものから捨てる。残ったメッセージの相対順は保たれる。

use crate::domain::{Message, Role};
use crate::error::Error;
use std::collections::VecDeque;

/// 既定の保持件数
pub const DEFAULT_MAX_MESSAGES: usize = 20;

/// 上限付きの会話履歴
///
/// `max_messages` が `None` のときは無制限。`Some(0)` も有効で、追加した直後に全件捨てる。
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    max_messages: Option<usize>,
    messages: VecDeque<Message>,
}

impl ConversationMemory {
    pub fn new(max_messages: Option<usize>) -> Self {
        Self {
            max_messages,
            messages: VecDeque::new(),
        }
    }

    /// 無制限のメモリ
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// 符号付きの上限から作る。負の値は設定エラー。
    pub fn from_limit(limit: Option<i64>) -> Result<Self, Error> {
        match limit {
            None => Ok(Self::unbounded()),
            Some(n) if n < 0 => Err(Error::config(format!(
                "max_messages must not be negative (got {})",
                n
            ))),
            Some(n) => Ok(Self::new(Some(n as usize))),
        }
    }

    pub fn max_messages(&self) -> Option<usize> {
        self.max_messages
    }

    pub fn add(&mut self, role: Role, content: &str) {
        self.messages.push_back(Message::new(role, content.trim()));
        self.trim();
    }

    pub fn add_user_message(&mut self, content: &str) {
        self.add(Role::User, content);
    }

    pub fn add_ai_message(&mut self, content: &str) {
        self.add(Role::Assistant, content);
    }

    pub fn add_system_message(&mut self, content: &str) {
        self.add(Role::System, content);
    }

    /// 現在の履歴のコピー（以後のストア変更は反映されない）
    pub fn history(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// 履歴を丸ごと置き換える。読み込み自体で上限を超えれば古いものを捨てる。
    pub fn load_history<I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        self.messages = messages.into_iter().map(|m| m.trimmed()).collect();
        self.trim();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim(&mut self) {
        let Some(max) = self.max_messages else {
            return;
        };
        while self.messages.len() > max {
            self.messages.pop_front();
        }
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_MESSAGES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(mem: &ConversationMemory) -> Vec<String> {
        mem.history().into_iter().map(|m| m.content).collect()
    }

    #[test]
    fn test_capacity_three_keeps_latest() {
        let mut mem = ConversationMemory::new(Some(3));
        for i in 1..=5 {
            mem.add_user_message(&format!("M{}", i));
        }
        assert_eq!(contents(&mem), vec!["M3", "M4", "M5"]);
    }

    #[test]
    fn test_length_law_for_various_capacities() {
        for cap in 0..6usize {
            let mut mem = ConversationMemory::new(Some(cap));
            for n in 1..=10usize {
                mem.add(Role::User, &n.to_string());
                assert_eq!(mem.len(), n.min(cap), "cap={} n={}", cap, n);
                let expected: Vec<String> = ((n + 1 - n.min(cap))..=n)
                    .filter(|_| cap > 0)
                    .map(|k| k.to_string())
                    .collect();
                assert_eq!(contents(&mem), expected, "cap={} n={}", cap, n);
            }
        }
    }

    #[test]
    fn test_unbounded_grows() {
        let mut mem = ConversationMemory::unbounded();
        for i in 0..100 {
            mem.add_ai_message(&format!("reply {}", i));
        }
        assert_eq!(mem.len(), 100);
        assert_eq!(mem.max_messages(), None);
    }

    #[test]
    fn test_capacity_zero_evicts_everything() {
        let mut mem = ConversationMemory::new(Some(0));
        mem.add_user_message("hi");
        assert!(mem.is_empty());
    }

    #[test]
    fn test_add_trims_whitespace() {
        let mut mem = ConversationMemory::default();
        mem.add_system_message("  be brief \n");
        let h = mem.history();
        assert_eq!(h[0].content, "be brief");
        assert_eq!(h[0].role, Role::System);
    }

    #[test]
    fn test_history_is_snapshot() {
        let mut mem = ConversationMemory::default();
        mem.add_user_message("one");
        let snapshot = mem.history();
        mem.add_user_message("two");
        mem.clear();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content, "one");
    }

    #[test]
    fn test_clear() {
        let mut mem = ConversationMemory::default();
        mem.add_user_message("a");
        mem.add_ai_message("b");
        mem.clear();
        assert!(mem.is_empty());
    }

    #[test]
    fn test_load_history_trims_and_evicts() {
        let mut mem = ConversationMemory::new(Some(2));
        mem.add_user_message("old");
        mem.load_history(vec![
            Message::user(" a "),
            Message::assistant("b\n"),
            Message::user("\tc"),
        ]);
        let h = mem.history();
        assert_eq!(h, vec![Message::assistant("b"), Message::user("c")]);
    }

    #[test]
    fn test_from_limit_rejects_negative() {
        let err = ConversationMemory::from_limit(Some(-1)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            ConversationMemory::from_limit(Some(5)).unwrap().max_messages(),
            Some(5)
        );
        assert_eq!(ConversationMemory::from_limit(None).unwrap().max_messages(), None);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(
            ConversationMemory::default().max_messages(),
            Some(DEFAULT_MAX_MESSAGES)
        );
    }
}
