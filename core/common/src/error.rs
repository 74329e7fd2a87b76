//! エラーハンドリング
//!
//! core 全体で 1 つの `Error` に統一する。呼び出し側は種別で「続行できるか」を判断する
//! （例: `Render` なら会話は続けて図だけ諦める）。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 入力不正（空のユーザー入力・引数エラーなど）
    #[error("{0}")]
    InvalidArgument(String),
    /// 設定不正（API キー未設定・負の履歴上限など）
    #[error("{0}")]
    Config(String),
    /// 図のレンダリング失敗（サービス到達不可・HTTP ステータス・URL 生成不可）
    #[error("{0}")]
    Render(String),
    /// 協調コンポーネントが利用できない（HTTP クライアント生成失敗など）
    #[error("{0}")]
    Unavailable(String),
    /// モデル API の通信・ステータスエラー
    #[error("{0}")]
    Http(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    Io(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// 使い方の表示が必要なエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// レンダリング由来のエラーか（会話は続行可能）
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// プロセス終了コード（sysexits.h 準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Unavailable(_) => 69,
            Self::Config(_) => 78,
            Self::Render(_) | Self::Http(_) | Self::Json(_) => 70,
            Self::Io(_) => 74,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
