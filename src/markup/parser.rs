use std::collections::HashMap;

use tracing::trace;

use super::document::{MarkupDocument, Section};
use super::scanner::{strip_tags, Scanner, Tag, TagKind};

pub const DEFAULT_NAMESPACE: &str = "ns";

const TITLE_TAG: &str = "report_title";
const SUBTITLE_TAG: &str = "report_subtitle";
const SECTION_TAG: &str = "section";
const LEAF_TAGS: [&str; 2] = ["paragraph", "recommendation"];

/// Stateless parser for the report markup.
///
/// Every call re-scans the whole input, so it can be pointed at a buffer that
/// is still growing. Blocks match like a lazy pattern: an open tag pairs with
/// the first later close tag of the same name, and scanning resumes after it.
/// Unclosed blocks simply don't match yet.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    namespace: String,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl MarkupParser {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Parse `raw` into a document.
    ///
    /// Returns `None` until the input holds a title and at least one
    /// completed section; that is the normal state of a partial stream.
    pub fn parse(&self, raw: &str) -> Option<MarkupDocument> {
        let tags: Vec<Tag<'_>> = Scanner::new(raw, &self.namespace).collect();

        let title = tags
            .iter()
            .filter(|t| t.starts(TITLE_TAG))
            .find_map(|t| t.attr("title"))?;

        let subtitle = tags
            .iter()
            .filter(|t| t.starts(SUBTITLE_TAG))
            .find_map(|t| t.attr("subtitle"))
            .unwrap_or_default();

        let is_section = |t: &Tag<'_>| {
            t.kind == TagKind::Open && t.name == SECTION_TAG && t.attr("title").is_some()
        };
        let is_leaf = |t: &Tag<'_>| t.kind == TagKind::Open && LEAF_TAGS.contains(&t.name);

        let sections: Vec<Section> = match_blocks(&tags, is_section)
            .into_iter()
            .map(|(open, close)| {
                let inner = &tags[open + 1..close];
                let paragraphs = match_blocks(inner, is_leaf)
                    .into_iter()
                    .map(|(p_open, p_close)| {
                        let body = &raw[inner[p_open].end..inner[p_close].start];
                        strip_tags(body).trim().to_string()
                    })
                    .collect();

                Section {
                    title: tags[open].attr("title").unwrap_or_default().to_string(),
                    paragraphs,
                }
            })
            .collect();

        trace!(tags = tags.len(), sections = sections.len(), "scanned markup");

        if sections.is_empty() {
            return None;
        }

        Some(MarkupDocument {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            sections,
        })
    }
}

/// Parse with the default namespace.
pub fn parse_markup_document(raw: &str) -> Option<MarkupDocument> {
    MarkupParser::default().parse(raw)
}

/// Pair each opening tag accepted by `is_open` with the first later close tag
/// of the same name, left to right, never overlapping. Returns index pairs
/// into `tags`.
fn match_blocks(tags: &[Tag<'_>], is_open: impl Fn(&Tag<'_>) -> bool) -> Vec<(usize, usize)> {
    // next_close[i]: index of the first close tag after i that ends tag i's block
    let mut next_close = vec![None; tags.len()];
    let mut latest_close: HashMap<&str, usize> = HashMap::new();
    for (i, tag) in tags.iter().enumerate().rev() {
        if tag.kind == TagKind::Close {
            latest_close.insert(tag.name, i);
        } else if is_open(tag) {
            next_close[i] = latest_close.get(tag.name).copied();
        }
    }

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < tags.len() {
        match next_close[i] {
            Some(close) => {
                blocks.push((i, close));
                i = close + 1;
            }
            None => i += 1,
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<ns:report_title title="Q1 Outlook" />"#;

    #[test]
    fn test_minimal_document() {
        let doc = parse_markup_document(
            r#"<ns:report_title title="Q1 Outlook" /><ns:section title="Risks"><ns:paragraph>Inflation rising.</ns:paragraph></ns:section>"#,
        )
        .unwrap();

        assert_eq!(
            doc,
            MarkupDocument {
                title: "Q1 Outlook".to_string(),
                subtitle: String::new(),
                sections: vec![Section {
                    title: "Risks".to_string(),
                    paragraphs: vec!["Inflation rising.".to_string()],
                }],
            }
        );
    }

    #[test]
    fn test_missing_title_is_none() {
        assert!(parse_markup_document(r#"<ns:section title="Risks"></ns:section>"#).is_none());
    }

    #[test]
    fn test_title_without_sections_is_none() {
        assert!(parse_markup_document(HEADER).is_none());
    }

    #[test]
    fn test_unterminated_section_is_none() {
        let raw = r#"<ns:report_title title="X" /><ns:section title="A">"#;
        assert!(parse_markup_document(raw).is_none());
    }

    #[test]
    fn test_empty_section_is_valid() {
        let raw = format!(r#"{HEADER}<ns:section title="Empty"></ns:section>"#);
        let doc = parse_markup_document(&raw).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].paragraphs.is_empty());
    }

    #[test]
    fn test_subtitle_and_section_order() {
        let raw = format!(
            r#"{HEADER}
<ns:report_subtitle subtitle="Prepared for the board" />
<ns:section title="Market">
  <ns:paragraph>  Demand is <b>strong</b>.  </ns:paragraph>
  <ns:recommendation>Enter via joint venture.</ns:recommendation>
  <ns:paragraph>Pricing is stable.</ns:paragraph>
</ns:section>
<ns:section title="Risks"><ns:paragraph>Currency.</ns:paragraph></ns:section>"#
        );
        let doc = parse_markup_document(&raw).unwrap();

        assert_eq!(doc.subtitle, "Prepared for the board");
        let titles: Vec<_> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Market", "Risks"]);
        assert_eq!(
            doc.sections[0].paragraphs,
            vec![
                "Demand is strong.".to_string(),
                "Enter via joint venture.".to_string(),
                "Pricing is stable.".to_string(),
            ]
        );
        assert_eq!(doc.paragraph_count(), 4);
    }

    #[test]
    fn test_first_title_wins() {
        let raw = r#"<ns:report_title title="First" /><ns:report_title title="Second" /><ns:section title="S"></ns:section>"#;
        assert_eq!(parse_markup_document(raw).unwrap().title, "First");
    }

    #[test]
    fn test_section_without_title_is_skipped() {
        let raw = format!(
            r#"{HEADER}<ns:section><ns:paragraph>orphan</ns:paragraph></ns:section><ns:section title="Kept"><ns:paragraph>ok</ns:paragraph></ns:section>"#
        );
        let doc = parse_markup_document(&raw).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Kept");
        assert_eq!(doc.sections[0].paragraphs, vec!["ok".to_string()]);
    }

    #[test]
    fn test_paragraph_outside_section_is_ignored() {
        let raw = format!(
            r#"{HEADER}<ns:paragraph>loose</ns:paragraph><ns:section title="S"><ns:paragraph>inside</ns:paragraph></ns:section>"#
        );
        let doc = parse_markup_document(&raw).unwrap();
        assert_eq!(doc.sections[0].paragraphs, vec!["inside".to_string()]);
    }

    #[test]
    fn test_nested_section_closes_at_first_close_tag() {
        let raw = format!(
            r#"{HEADER}<ns:section title="Outer"><ns:section title="Inner"><ns:paragraph>p</ns:paragraph></ns:section></ns:section>"#
        );
        let doc = parse_markup_document(&raw).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Outer");
        assert_eq!(doc.sections[0].paragraphs, vec!["p".to_string()]);
    }

    #[test]
    fn test_unclosed_paragraph_does_not_hide_later_recommendation() {
        let raw = format!(
            r#"{HEADER}<ns:section title="S"><ns:paragraph>never closed <ns:recommendation>Act now.</ns:recommendation></ns:section>"#
        );
        let doc = parse_markup_document(&raw).unwrap();
        assert_eq!(doc.sections[0].paragraphs, vec!["Act now.".to_string()]);
    }

    #[test]
    fn test_titles_keep_angle_brackets() {
        let raw = r#"<ns:report_title title="Growth <5%: Outlook" /><ns:section title="Deals <$5M"><ns:paragraph>Two closed.</ns:paragraph></ns:section><ns:section title="Big"></ns:section>"#;
        let doc = parse_markup_document(raw).unwrap();

        assert_eq!(doc.title, "Growth <5%: Outlook");
        let titles: Vec<_> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Deals <$5M", "Big"]);
        assert_eq!(doc.sections[0].paragraphs, vec!["Two closed.".to_string()]);
    }

    #[test]
    fn test_custom_namespace() {
        let parser = MarkupParser::new("nsil");
        let raw = r#"<nsil:report_title title="T" /><nsil:section title="S"><nsil:paragraph>x</nsil:paragraph></nsil:section>"#;
        assert!(parser.parse(raw).is_some());
        assert!(parse_markup_document(raw).is_none());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = format!(
            r#"{HEADER}<ns:section title="A"><ns:paragraph>one</ns:paragraph></ns:section><ns:section title="B">"#
        );
        assert_eq!(parse_markup_document(&raw), parse_markup_document(&raw));
    }

    #[test]
    fn test_garbage_never_panics() {
        for raw in [
            "",
            "<",
            "<<<>>>",
            "</ns:section></ns:section>",
            "<ns:report_title title=\"",
            "<ns:section title=\"A\"></ns:section",
            "plain text with no tags at all",
        ] {
            assert!(parse_markup_document(raw).is_none());
        }
    }
}
