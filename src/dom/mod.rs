// src/dom/mod.rs
//! Read-only view of a document tree used by the extraction engine.
//!
//! The extractors never touch `scraper` types directly: they work against
//! [`DocumentNode`], which exposes only the handful of capabilities the
//! heuristics need (descendant queries, flattened text, attributes and a
//! parent/children walk). `ElementRef` is the shipped implementation.

pub mod text;

use scraper::{ElementRef, Selector};

/// A compiled structural pattern (CSS selector) together with its source text,
/// kept around so strategy decisions can be logged by pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: &'static str,
    selector: Selector,
}

impl Pattern {
    /// Compiles a single pattern. Returns `None` for selectors `scraper` rejects.
    pub fn parse(source: &'static str) -> Option<Self> {
        match Selector::parse(source) {
            Ok(selector) => Some(Self { source, selector }),
            Err(e) => {
                tracing::warn!("Ignoring invalid structural pattern '{}': {:?}", source, e);
                None
            }
        }
    }

    /// Compiles an ordered pattern list, dropping entries that fail to parse.
    pub fn compile_all(sources: &[&'static str]) -> Vec<Self> {
        sources.iter().filter_map(|src| Self::parse(*src)).collect()
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Capabilities the extraction engine requires from a document tree node.
pub trait DocumentNode: Clone {
    /// All descendants (not the node itself) matching `pattern`, in document order.
    fn query(&self, pattern: &Pattern) -> Vec<Self>;

    /// Immediate element children, in document order.
    fn element_children(&self) -> Vec<Self>;

    fn parent_element(&self) -> Option<Self>;

    /// Lower-case tag name.
    fn tag_name(&self) -> &str;

    fn attr(&self, name: &str) -> Option<&str>;

    /// Rendered text of the subtree, one visual line per `\n`.
    fn inner_text(&self) -> String;

    /// Markup of the node, used only for diagnostics.
    fn outer_html(&self) -> String;
}

impl<'a> DocumentNode for ElementRef<'a> {
    fn query(&self, pattern: &Pattern) -> Vec<Self> {
        let own_id = self.id();
        self.select(pattern.selector())
            .filter(|found| found.id() != own_id)
            .collect()
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn inner_text(&self) -> String {
        text::rendered_text(*self)
    }

    fn outer_html(&self) -> String {
        self.html()
    }
}

/// Truncates markup for log output without splitting a UTF-8 sequence.
pub fn snippet(html: &str, max: usize) -> &str {
    if html.len() <= max {
        return html;
    }
    let mut end = max;
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[..end]
}
