// src/extractors/section.rs

// --- Imports ---
use crate::dom::{snippet, DocumentNode, Pattern};
use crate::extractors::strategy::{first_success, Strategy};
use once_cell::sync::Lazy;
use std::fmt;

// --- Constants ---
// Tag of the element that encloses a whole profile section.
const SECTION_CONTAINER_TAG: &str = "section";
const SECTION_LOG_SNIPPET: usize = 1000;

// --- Structural Patterns (Lazy Static) ---
// Card containers that each hold one profile section
static CARD_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("section.artdeco-card").expect("Failed to compile CARD_PATTERN")
});

// Section headings inside a card
static HEADING_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("h2").expect("Failed to compile HEADING_PATTERN")
});

// Any element carrying an id, used to find section anchors
static ANCHOR_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("[id]").expect("Failed to compile ANCHOR_PATTERN")
});

/// Logical section of a profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionLabel {
    Experience,
    Education,
}

impl SectionLabel {
    /// Text expected (case-sensitively) inside the section's heading.
    pub fn heading(&self) -> &'static str {
        match self {
            SectionLabel::Experience => "Experience",
            SectionLabel::Education => "Education",
        }
    }

    /// Value of the `id` attribute marking the section's anchor.
    pub fn anchor_id(&self) -> String {
        self.heading().to_lowercase()
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

struct SectionQuery<'d, N> {
    document: &'d N,
    label: SectionLabel,
}

/// Finds the subtree holding `label`'s content, or `None` when the document
/// has no such section.
///
/// Tries a heading scan over the card containers first, then climbs from the
/// section's anchor element to its enclosing `<section>`.
pub fn locate<N: DocumentNode>(document: &N, label: SectionLabel) -> Option<N> {
    let query = SectionQuery { document, label };
    let strategies = [
        Strategy::new("heading-scan", by_heading::<N>),
        Strategy::new("anchor-ascent", by_anchor::<N>),
    ];

    let goal = format!("locate {} section", label);
    let section = first_success(&goal, &query, &strategies);
    match &section {
        Some(found) => tracing::debug!(
            "{} section HTML: {}...",
            label,
            snippet(&found.outer_html(), SECTION_LOG_SNIPPET)
        ),
        None => tracing::warn!("Could not find {} section", label),
    }
    section
}

fn by_heading<N: DocumentNode>(query: &SectionQuery<'_, N>) -> Option<N> {
    let cards = query.document.query(&CARD_PATTERN);
    tracing::trace!("Found {} card containers on the page", cards.len());

    cards.into_iter().enumerate().find_map(|(index, card)| {
        let matched = card
            .query(&HEADING_PATTERN)
            .iter()
            .any(|heading| heading.inner_text().contains(query.label.heading()));
        if matched {
            tracing::info!("Found {} section with header at index {}", query.label, index);
            Some(card)
        } else {
            None
        }
    })
}

fn by_anchor<N: DocumentNode>(query: &SectionQuery<'_, N>) -> Option<N> {
    let anchor_id = query.label.anchor_id();
    let anchor = query
        .document
        .query(&ANCHOR_PATTERN)
        .into_iter()
        .find(|node| node.attr("id") == Some(anchor_id.as_str()))?;

    let mut current = Some(anchor);
    while let Some(node) = current {
        if node.tag_name().eq_ignore_ascii_case(SECTION_CONTAINER_TAG) {
            tracing::info!("Found {} section by navigating up from anchor", query.label);
            return Some(node);
        }
        current = node.parent_element();
    }
    tracing::debug!("Anchor '{}' has no enclosing <{}>", anchor_id, SECTION_CONTAINER_TAG);
    None
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn section_id<'a>(node: &scraper::ElementRef<'a>) -> Option<&'a str> {
        node.value().attr("data-test")
    }

    #[test]
    fn heading_scan_takes_first_matching_card() {
        let html = r#"
            <html><body>
            <section class="artdeco-card" data-test="about"><h2>About</h2></section>
            <section class="artdeco-card" data-test="exp-1"><h2><span>Experience</span></h2></section>
            <section class="artdeco-card" data-test="exp-2"><h2>Experience</h2></section>
            </body></html>
        "#;
        let doc = Html::parse_document(html);
        let found = locate(&doc.root_element(), SectionLabel::Experience).unwrap();
        assert_eq!(section_id(&found), Some("exp-1"));
    }

    #[test]
    fn heading_match_is_case_sensitive() {
        let html = r#"<html><body>
            <section class="artdeco-card" data-test="lower"><h2>experience</h2></section>
            </body></html>"#;
        let doc = Html::parse_document(html);
        assert!(locate(&doc.root_element(), SectionLabel::Experience).is_none());
    }

    #[test]
    fn falls_back_to_anchor_ascent() {
        let html = r#"<html><body>
            <section class="artdeco-card" data-test="about"><h2>About</h2></section>
            <section class="pv-profile-card" data-test="edu">
                <div><div id="education" class="pv-profile-card__anchor"></div></div>
                <div><span>Schools</span></div>
            </section>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let found = locate(&doc.root_element(), SectionLabel::Education).unwrap();
        assert_eq!(section_id(&found), Some("edu"));
    }

    #[test]
    fn anchor_on_the_section_itself() {
        let html = r#"<html><body>
            <section id="experience" data-test="outer-exp">
                <section id="education" data-test="edu"><ul><li>MIT</li></ul></section>
            </section>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let found = locate(&doc.root_element(), SectionLabel::Education).unwrap();
        assert_eq!(section_id(&found), Some("edu"));
        let found = locate(&doc.root_element(), SectionLabel::Experience).unwrap();
        assert_eq!(section_id(&found), Some("outer-exp"));
    }

    #[test]
    fn anchor_without_enclosing_section_is_absent() {
        let html = r#"<html><body><div id="experience"></div><div>Jobs</div></body></html>"#;
        let doc = Html::parse_document(html);
        assert!(locate(&doc.root_element(), SectionLabel::Experience).is_none());
    }

    #[test]
    fn missing_section_is_absent() {
        let html = r#"<html><body>
            <section class="artdeco-card"><h2>Experience</h2></section>
            <div id="skills"></div>
            </body></html>"#;
        let doc = Html::parse_document(html);
        assert!(locate(&doc.root_element(), SectionLabel::Education).is_none());
    }

    #[test]
    fn labels_know_their_anchor() {
        assert_eq!(SectionLabel::Experience.anchor_id(), "experience");
        assert_eq!(SectionLabel::Education.to_string(), "Education");
    }
}
