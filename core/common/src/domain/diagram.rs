//! レンダリング済みの図

use serde::{Deserialize, Serialize};

/// 図の画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Png,
    Svg,
}

impl DiagramFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// 保存時の拡張子
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1 つの PlantUML ブロックから作った図。生成後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    /// 元の PlantUML（@startuml / @enduml を含む）
    pub code: String,
    /// 画像バイト列
    pub data: Vec<u8>,
    pub format: DiagramFormat,
    pub image_url: Option<String>,
    /// PlantUML サーバのエディタ画面 URL
    pub editor_url: Option<String>,
}
