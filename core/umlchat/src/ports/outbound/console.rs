//! ユーザー向け表示の Outbound ポート
//!
//! 構造化ログ（common::ports::outbound::Log）とは別。こちらは人が読む文だけを出す。

/// 端末への表示
pub trait Console {
    /// 通常の出力（stdout）
    fn say(&self, text: &str);
    /// 警告・エラー（stderr）
    fn warn(&self, text: &str);
}
