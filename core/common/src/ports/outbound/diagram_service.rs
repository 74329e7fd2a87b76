//! 図レンダリングサービス Outbound ポート
//!
//! PlantUML テキストから取得可能な画像 URL を作り、その URL から画像を取ってくる。

use crate::domain::DiagramFormat;
use crate::error::Error;

/// レンダリングサービス抽象（Outbound ポート）
///
/// 実装は `common::plantuml::PlantUmlServer` やテスト用のフェイクなど。
pub trait DiagramService: Send + Sync {
    /// 画像 URL を作る。使える URL が作れなければ `None`。
    fn image_url(&self, code: &str, format: DiagramFormat) -> Option<String>;

    /// URL から画像を取得する。通信失敗・HTTP ステータス異常は `Error::Render`。
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error>;
}
