//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（端末入力・表示・割り込み）を使うための trait

pub mod inbound;
pub mod outbound;
