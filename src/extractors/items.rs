// src/extractors/items.rs
use crate::dom::{DocumentNode, Pattern};
use crate::extractors::strategy::{first_success, non_empty, Strategy};
use once_cell::sync::Lazy;

static LIST_ITEM_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("li.artdeco-list__item").expect("Failed to compile LIST_ITEM_PATTERN")
});

static LIST_CONTAINER_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("ul").expect("Failed to compile LIST_CONTAINER_PATTERN")
});

static FLEX_RECORD_PATTERN: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("div.display-flex.flex-column").expect("Failed to compile FLEX_RECORD_PATTERN")
});

const LIST_ITEM_TAG: &str = "li";

/// Returns the repeated entry nodes of a located section, in document order.
///
/// Strategies go from most to least specific markup; an empty result means the
/// section simply has no entries.
pub fn enumerate<N: DocumentNode>(section: &N) -> Vec<N> {
    let strategies = [
        Strategy::new("artdeco-list-items", by_list_items::<N>),
        Strategy::new("first-list-children", by_first_list::<N>),
        Strategy::new("flex-column-records", by_flex_records::<N>),
    ];
    let items = first_success("enumerate entries", section, &strategies).unwrap_or_default();
    tracing::info!("Found {} entries in section", items.len());
    items
}

fn by_list_items<N: DocumentNode>(section: &N) -> Option<Vec<N>> {
    non_empty(section.query(&LIST_ITEM_PATTERN))
}

fn by_first_list<N: DocumentNode>(section: &N) -> Option<Vec<N>> {
    let lists = section.query(&LIST_CONTAINER_PATTERN);
    tracing::trace!("Found {} list containers in section", lists.len());
    let first = lists.into_iter().next()?;
    let items = first
        .element_children()
        .into_iter()
        .filter(|child| child.tag_name().eq_ignore_ascii_case(LIST_ITEM_TAG))
        .collect();
    non_empty(items)
}

fn by_flex_records<N: DocumentNode>(section: &N) -> Option<Vec<N>> {
    non_empty(section.query(&FLEX_RECORD_PATTERN))
}
