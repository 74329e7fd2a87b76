//! PlantUML の抽出・レンダリング・保存
//!
//! モデル応答から `@startuml` … `@enduml` を取り出し、PlantUML サーバで画像化してディスクに書く。

pub mod encode;
pub mod extract;
pub mod render;
pub mod save;

pub use extract::extract_plantuml_blocks;
pub use render::{editor_url_for, resolve_endpoint, DiagramRenderer, PlantUmlServer};
pub use save::DiagramWriter;
