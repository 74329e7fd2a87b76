//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! 対話ループは 1 行読むごとにこれを確認し、割り込まれていればセッションを終える。

/// 割り込みが要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
