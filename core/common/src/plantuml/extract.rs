//! PlantUML ブロックの抽出

use regex::Regex;
use std::sync::OnceLock;

/// 大文字小文字を区別せず、改行をまたいで最短一致する
const PLANTUML_PATTERN: &str = r"(?is)@startuml.*?@enduml";

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLANTUML_PATTERN).expect("PLANTUML_PATTERN is a valid regex"))
}

/// テキスト中の PlantUML ブロックを出現順に返す。
///
/// マーカーを含むブロック全体を前後の空白を除いて返す。
/// 終端のない `@startuml` は一致しないだけでエラーにはならない。
pub fn extract_plantuml_blocks(text: &str) -> Vec<String> {
    pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_multiple_snippets_in_order() {
        let text = "\n    Analysis:\n    - placeholder\n\n    @startuml\n    Alice -> Bob : Hello\n    @enduml\n\n    Notes between diagrams.\n\n    @startuml\n    Bob -> Carol : Hi!\n    @enduml\n    ";
        let blocks = extract_plantuml_blocks(text);
        assert_eq!(blocks.len(), 2);
        for b in &blocks {
            assert!(b.starts_with("@startuml"));
            assert!(b.ends_with("@enduml"));
        }
        assert!(blocks[0].contains("Alice -> Bob"));
        assert!(blocks[1].contains("Bob -> Carol"));
    }

    #[test]
    fn test_two_blocks_inline() {
        let text = "...@startuml\nA->B\n@enduml...@startuml\nB->C\n@enduml...";
        let blocks = extract_plantuml_blocks(text);
        assert_eq!(blocks, vec!["@startuml\nA->B\n@enduml", "@startuml\nB->C\n@enduml"]);
    }

    #[test]
    fn test_no_blocks() {
        assert!(extract_plantuml_blocks("just prose, no diagrams").is_empty());
        assert!(extract_plantuml_blocks("").is_empty());
    }

    #[test]
    fn test_case_insensitive_markers_kept_verbatim() {
        let blocks = extract_plantuml_blocks("x @StartUML\nclass A\n@ENDUML y");
        assert_eq!(blocks, vec!["@StartUML\nclass A\n@ENDUML"]);
    }

    #[test]
    fn test_unterminated_block_is_ignored() {
        let text = "@startuml\nA -> B\n@enduml\n@startuml\nnever closed";
        let blocks = extract_plantuml_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("A -> B"));
    }

    #[test]
    fn test_nested_start_matches_shortest_span() {
        // 内側の @startuml は外側のブロック本文として扱われ、最初の @enduml で閉じる
        let text = "@startuml\nouter\n@startuml\ninner\n@enduml\ntrailing\n@enduml";
        let blocks = extract_plantuml_blocks(text);
        assert_eq!(blocks, vec!["@startuml\nouter\n@startuml\ninner\n@enduml"]);
    }

    #[test]
    fn test_extraction_is_idempotent_on_a_block() {
        let text = "intro\n@startuml\nactor User\nUser -> System : login\n@enduml\noutro";
        let first = extract_plantuml_blocks(text);
        assert_eq!(first.len(), 1);
        let again = extract_plantuml_blocks(&first[0]);
        assert_eq!(again, first);
    }
}
