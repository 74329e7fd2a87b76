//! 対話ループで 1 行ごとに解釈するコマンド（Command Pattern）
//!
//! スラッシュコマンドはモデルに送る前にここで振り分ける。

/// 入力 1 行の解釈結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// `/exit`・`exit`・`quit`
    Exit,
    /// `/reset`: 履歴を消す
    Reset,
    /// `/note <text>`: システムメモを追加（本文が空なら何もしない）
    Note(String),
    /// `/format <text>`: 出力形式の指示を差し替える
    Format(String),
    /// 空行
    Empty,
    /// モデルに送る発言
    Say(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let command = line.trim();
        if matches!(command.to_lowercase().as_str(), "/exit" | "exit" | "quit") {
            return Self::Exit;
        }
        if command.starts_with("/reset") {
            return Self::Reset;
        }
        if let Some(rest) = command.strip_prefix("/note ") {
            return Self::Note(rest.trim().to_string());
        }
        if let Some(rest) = command.strip_prefix("/format ") {
            return Self::Format(rest.trim().to_string());
        }
        if command.is_empty() {
            return Self::Empty;
        }
        Self::Say(command.to_string())
    }
}
