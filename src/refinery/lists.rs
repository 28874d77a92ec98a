// * List Extraction
// * List items whose text spans several lines: first line is the name, the
// * remaining lines form the address.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use tracing::info;

use super::record::{char_len, passes_record_thresholds, Candidate, SourceKind};
use super::text::normalize;
use crate::config::constants::LIST_ITEM_MIN_LEN;

static SELECTOR_LIST_ITEMS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"ul li, ol li, .list-item, .item, .entry, .hospital-item,
           .company-item, .entity-item, [class*="list"], [class*="item"]"#,
    )
    .expect("Invalid list item selector")
});

// * Elements that start a new visual line
const LINE_BREAKING_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "address", "tr",
    "dt", "dd", "section", "article",
];

/// Extracts entity/address candidates from list-like elements
#[derive(Debug, Default)]
pub struct ListExtractor;

impl ListExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Visits list-like elements in document order, skipping containers
    /// that hold other list-like elements
    pub fn extract(&self, document: &Html, source_url: &str) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = document
            .select(&SELECTOR_LIST_ITEMS)
            .filter(|item| !contains_list_item(item))
            .filter_map(|item| item_candidate(&item, source_url))
            .collect();

        info!(count = candidates.len(), "list candidates extracted");
        candidates
    }
}

fn contains_list_item(item: &ElementRef) -> bool {
    item.select(&SELECTOR_LIST_ITEMS).next().is_some()
}

fn item_candidate(item: &ElementRef, source_url: &str) -> Option<Candidate> {
    let lines = item_lines(item);
    if char_len(&lines.join(" ")) <= LIST_ITEM_MIN_LEN {
        return None;
    }

    let (name, rest) = lines.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let address = rest.join(" ");

    if !passes_record_thresholds(name, &address) {
        return None;
    }

    Some(Candidate::new(
        name.clone(),
        address,
        source_url,
        SourceKind::List,
    ))
}

/// Text of an element split into normalized, non-empty lines.
/// Source line breaks and line-breaking tags both end a line.
pub fn item_lines(item: &ElementRef) -> Vec<String> {
    let mut raw = String::new();

    for node in item.descendants().skip(1) {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if LINE_BREAKING_TAGS.contains(&el.name()) => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        ListExtractor::new().extract(&document, "https://example.com/list")
    }

    #[test]
    fn test_br_separated_item() {
        let html = r#"
            <ul>
                <li><strong>Apollo Hospital</strong><br>21 Greams Lane<br>Chennai 600006</li>
            </ul>
        "#;
        let candidates = extract(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].entity_name, "Apollo Hospital");
        assert_eq!(candidates[0].address, "21 Greams Lane Chennai 600006");
        assert_eq!(candidates[0].source_kind, SourceKind::List);
        assert_eq!(candidates[0].table_index, None);
    }

    #[test]
    fn test_source_newlines_split_lines() {
        let html = "<ol><li>\n  Care Clinic\n  7 Civil Lines, Agra\n</li></ol>";
        let candidates = extract(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].entity_name, "Care Clinic");
        assert_eq!(candidates[0].address, "7 Civil Lines, Agra");
    }

    #[test]
    fn test_single_line_item_ignored() {
        let html = "<ul><li>Apollo Hospital, 21 Greams Lane, Chennai</li></ul>";
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_short_item_ignored() {
        let html = "<ul><li>Ab<br>Cdefg</li></ul>";
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_container_not_double_counted() {
        let html = r#"
            <div class="hospital-list">
                <div class="hospital-item">City Hospital<br>12 Mall Road, Ludhiana</div>
                <div class="hospital-item">Hope Clinic<br>3 Station Road, Agra</div>
            </div>
        "#;
        let candidates = extract(html);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].entity_name, "Hope Clinic");
    }

    #[test]
    fn test_item_lines_drop_blank_lines() {
        let document = Html::parse_document("<ul><li>\n\nOne<br><br>Two &amp; Three\n</li></ul>");
        let item = document.select(&SELECTOR_LIST_ITEMS).next().unwrap();
        assert_eq!(item_lines(&item), vec!["One", "Two & Three"]);
    }
}
