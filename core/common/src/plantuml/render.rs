//! PlantUML のレンダリング
//!
//! URL の組み立てとダウンロードは `DiagramService` ポートに任せ、
//! ここではエディタ URL の導出・エラー種別の統一・複数ブロックの逐次処理を行う。

use crate::domain::{Diagram, DiagramFormat};
use crate::error::Error;
use crate::plantuml::encode::encode_text;
use crate::plantuml::extract::extract_plantuml_blocks;
use crate::ports::outbound::{DiagramService, Log, LogLevel, LogRecord};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PNG_ENDPOINT: &str = "https://www.plantuml.com/plantuml/png/";
pub const DEFAULT_SVG_ENDPOINT: &str = "https://www.plantuml.com/plantuml/svg/";

/// 両形式のエンドポイントを差し替える環境変数
pub const SERVER_URL_ENV: &str = "PLANTUML_SERVER_URL";

/// 画像ダウンロードのタイムアウト
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// 形式ごとのエンドポイントを決める。`custom` が空でなければ両形式ともそれを使う（末尾 `/` を補う）。
pub fn resolve_endpoint(custom: Option<&str>, format: DiagramFormat) -> String {
    if let Some(c) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        return if c.ends_with('/') {
            c.to_string()
        } else {
            format!("{}/", c)
        };
    }
    match format {
        DiagramFormat::Png => DEFAULT_PNG_ENDPOINT.to_string(),
        DiagramFormat::Svg => DEFAULT_SVG_ENDPOINT.to_string(),
    }
}

/// 画像 URL からエディタ画面の URL を導く。
///
/// パス中の最初の `/<format>/`（`/png/` か `/svg/`）を `/uml/` に置き換える。
/// 該当する区間が無い、または URL として解釈できなければ `None`。
pub fn editor_url_for(image_url: &str, format: DiagramFormat) -> Option<String> {
    let mut url = Url::parse(image_url).ok()?;
    let segment = format!("/{}/", format.as_str());
    let path = url.path().to_string();
    if !path.contains(&segment) {
        return None;
    }
    url.set_path(&path.replacen(&segment, "/uml/", 1));
    Some(url.to_string())
}

/// PlantUML サーバ（HTTP）を使う `DiagramService` の標準実装
pub struct PlantUmlServer {
    custom_endpoint: Option<String>,
    client: reqwest::blocking::Client,
}

impl PlantUmlServer {
    /// `custom_endpoint` が指定されれば両形式ともそこへ送る
    pub fn new(custom_endpoint: Option<String>) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::unavailable(format!("Failed to build HTTP client for PlantUML: {}", e)))?;
        Ok(Self {
            custom_endpoint,
            client,
        })
    }

    /// 環境変数 PLANTUML_SERVER_URL を見て作る
    pub fn from_env() -> Result<Self, Error> {
        Self::new(std::env::var(SERVER_URL_ENV).ok())
    }

    pub fn endpoint(&self, format: DiagramFormat) -> String {
        resolve_endpoint(self.custom_endpoint.as_deref(), format)
    }
}

impl DiagramService for PlantUmlServer {
    fn image_url(&self, code: &str, format: DiagramFormat) -> Option<String> {
        let encoded = encode_text(code).ok()?;
        if encoded.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.endpoint(format), encoded))
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::render(format!("Failed to download diagram: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::render(format!(
                "Failed to download diagram: HTTP {} for {}",
                status, url
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| Error::render(format!("Failed to read diagram body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// PlantUML を図に変換するレンダラ
pub struct DiagramRenderer {
    service: Arc<dyn DiagramService>,
    logger: Arc<dyn Log>,
}

impl DiagramRenderer {
    pub fn new(service: Arc<dyn DiagramService>, logger: Arc<dyn Log>) -> Self {
        Self { service, logger }
    }

    /// 1 つの PlantUML ブロックを画像にする
    pub fn render(&self, code: &str, format: DiagramFormat) -> Result<Diagram, Error> {
        let image_url = self
            .service
            .image_url(code, format)
            .ok_or_else(|| Error::render("Could not create PlantUML image URL."))?;
        let editor_url = editor_url_for(&image_url, format);
        let data = self.service.fetch(&image_url)?;
        self.log(LogLevel::Debug, "diagram rendered", &image_url, Some(data.len()));
        Ok(Diagram {
            code: code.to_string(),
            data,
            format,
            image_url: Some(image_url),
            editor_url,
        })
    }

    /// テキストからブロックを抽出して順に描画する。最初の失敗でそのまま返す。
    pub fn render_from_text(&self, text: &str, format: DiagramFormat) -> Result<Vec<Diagram>, Error> {
        let blocks = extract_plantuml_blocks(text);
        let mut diagrams = Vec::with_capacity(blocks.len());
        for block in &blocks {
            match self.render(block, format) {
                Ok(d) => diagrams.push(d),
                Err(e) => {
                    self.log(LogLevel::Warn, &e.to_string(), "", None);
                    return Err(e);
                }
            }
        }
        Ok(diagrams)
    }

    fn log(&self, level: LogLevel, message: &str, url: &str, bytes: Option<usize>) {
        let mut rec = LogRecord::new(level, message).layer("core").kind("render");
        if !url.is_empty() {
            rec = rec.field("image_url", url);
        }
        if let Some(n) = bytes {
            rec = rec.field("bytes", n);
        }
        let _ = self.logger.log(&rec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::NoopLog;
    use std::sync::Mutex;

    /// 呼び出しを記録するフェイク
    struct FakeService {
        url: Option<String>,
        fail_fetch_on: Option<usize>,
        fetches: Mutex<Vec<String>>,
        url_calls: Mutex<usize>,
    }

    impl FakeService {
        fn ok() -> Self {
            Self {
                url: Some("https://www.plantuml.com/plantuml/png/SoWkIImgAStDuNBAJrBGjLDmpCbCJbMmKiX8pSd9".to_string()),
                fail_fetch_on: None,
                fetches: Mutex::new(Vec::new()),
                url_calls: Mutex::new(0),
            }
        }
    }

    impl DiagramService for FakeService {
        fn image_url(&self, _code: &str, _format: DiagramFormat) -> Option<String> {
            *self.url_calls.lock().unwrap() += 1;
            self.url.clone()
        }

        fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
            let mut f = self.fetches.lock().unwrap();
            f.push(url.to_string());
            if self.fail_fetch_on == Some(f.len()) {
                return Err(Error::render("Failed to download diagram: HTTP 503"));
            }
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    fn renderer(service: Arc<FakeService>) -> DiagramRenderer {
        DiagramRenderer::new(service, Arc::new(NoopLog))
    }

    #[test]
    fn test_resolve_endpoint_defaults() {
        assert_eq!(resolve_endpoint(None, DiagramFormat::Png), DEFAULT_PNG_ENDPOINT);
        assert_eq!(resolve_endpoint(None, DiagramFormat::Svg), DEFAULT_SVG_ENDPOINT);
        assert_eq!(resolve_endpoint(Some("  "), DiagramFormat::Svg), DEFAULT_SVG_ENDPOINT);
    }

    #[test]
    fn test_resolve_endpoint_custom_overrides_both_formats() {
        assert_eq!(
            resolve_endpoint(Some("http://localhost:8080/plantuml/png"), DiagramFormat::Svg),
            "http://localhost:8080/plantuml/png/"
        );
        assert_eq!(
            resolve_endpoint(Some("http://localhost:8080/x/"), DiagramFormat::Png),
            "http://localhost:8080/x/"
        );
    }

    #[test]
    fn test_editor_url_for_png_and_svg() {
        assert_eq!(
            editor_url_for("https://www.plantuml.com/plantuml/png/ABC", DiagramFormat::Png).as_deref(),
            Some("https://www.plantuml.com/plantuml/uml/ABC")
        );
        assert_eq!(
            editor_url_for("https://www.plantuml.com/plantuml/svg/ABC", DiagramFormat::Svg).as_deref(),
            Some("https://www.plantuml.com/plantuml/uml/ABC")
        );
    }

    #[test]
    fn test_editor_url_for_unknown_path_and_garbage() {
        assert_eq!(editor_url_for("http://localhost:8080/img/ABC", DiagramFormat::Png), None);
        assert_eq!(editor_url_for("not a url", DiagramFormat::Png), None);
    }

    #[test]
    fn test_editor_url_for_replaces_only_the_format_segment() {
        // 独自サーバのベースパスにもう一方の形式名が含まれていても触らない
        assert_eq!(
            editor_url_for("http://host/png/plantuml/svg/ABC", DiagramFormat::Svg).as_deref(),
            Some("http://host/png/plantuml/uml/ABC")
        );
        assert_eq!(editor_url_for("http://host/plantuml/png/ABC", DiagramFormat::Svg), None);
    }

    #[test]
    fn test_plantuml_server_builds_url() {
        let server = PlantUmlServer::new(None).unwrap();
        let url = server
            .image_url("@startuml\nA -> B\n@enduml", DiagramFormat::Svg)
            .unwrap();
        assert!(url.starts_with(DEFAULT_SVG_ENDPOINT));
        assert!(url.len() > DEFAULT_SVG_ENDPOINT.len());
    }

    #[test]
    fn test_render_builds_diagram() {
        let service = Arc::new(FakeService::ok());
        let d = renderer(Arc::clone(&service))
            .render("@startuml\nA -> B\n@enduml", DiagramFormat::Png)
            .unwrap();
        assert_eq!(d.code, "@startuml\nA -> B\n@enduml");
        assert_eq!(d.data, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(d.format, DiagramFormat::Png);
        assert!(d.image_url.as_deref().unwrap().contains("/png/"));
        assert!(d.editor_url.as_deref().unwrap().contains("/uml/"));
    }

    #[test]
    fn test_render_with_custom_path_leaves_editor_url_unset() {
        let service = Arc::new(FakeService {
            url: Some("http://localhost:8080/img/SoWkIImgAStDuNBAJrBGjLDmpCbCJbMmKiX8pSd9".to_string()),
            ..FakeService::ok()
        });
        let d = renderer(Arc::clone(&service))
            .render("@startuml\nA -> B\n@enduml", DiagramFormat::Png)
            .unwrap();
        assert!(d.image_url.is_some());
        assert_eq!(d.editor_url, None);
    }

    #[test]
    fn test_render_without_url_is_render_error() {
        let service = Arc::new(FakeService {
            url: None,
            ..FakeService::ok()
        });
        let err = renderer(Arc::clone(&service))
            .render("@startuml\n@enduml", DiagramFormat::Png)
            .unwrap_err();
        assert!(err.is_render());
        assert!(service.fetches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_from_text_without_blocks_skips_service() {
        let service = Arc::new(FakeService::ok());
        let diagrams = renderer(Arc::clone(&service))
            .render_from_text("no diagrams here", DiagramFormat::Png)
            .unwrap();
        assert!(diagrams.is_empty());
        assert_eq!(*service.url_calls.lock().unwrap(), 0);
        assert!(service.fetches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_from_text_renders_each_block() {
        let service = Arc::new(FakeService::ok());
        let text = "@startuml\nA -> B\n@enduml\ntext\n@startuml\nB -> C\n@enduml";
        let diagrams = renderer(Arc::clone(&service))
            .render_from_text(text, DiagramFormat::Svg)
            .unwrap();
        assert_eq!(diagrams.len(), 2);
        assert!(diagrams[0].code.contains("A -> B"));
        assert!(diagrams[1].code.contains("B -> C"));
        assert!(diagrams.iter().all(|d| d.format == DiagramFormat::Svg));
    }

    #[test]
    fn test_render_from_text_stops_on_first_failure() {
        let service = Arc::new(FakeService {
            fail_fetch_on: Some(2),
            ..FakeService::ok()
        });
        let text = "@startuml\n1\n@enduml @startuml\n2\n@enduml @startuml\n3\n@enduml";
        let err = renderer(Arc::clone(&service))
            .render_from_text(text, DiagramFormat::Png)
            .unwrap_err();
        assert!(err.is_render());
        // 3 つ目には進まない
        assert_eq!(service.fetches.lock().unwrap().len(), 2);
    }
}
