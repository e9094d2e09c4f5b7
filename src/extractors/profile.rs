// src/extractors/profile.rs
use crate::dom::{snippet, DocumentNode};
use crate::extractors::fields::{self, SectionEntry};
use crate::extractors::{items, section};
use crate::models::{EducationEntry, ExperienceEntry, ProfileRecord, ProfileRecordBuilder};
use scraper::Html;

const ENTRY_LOG_SNIPPET: usize = 500;

/// Assembles one [`ProfileRecord`] per document.
///
/// Nothing in here fails: a missing section, node or field simply leaves the
/// corresponding part of the record empty.
#[derive(Debug, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses `html_content` and extracts the profile found in it.
    pub fn extract_profile(&self, html_content: &str, profile_url: &str) -> ProfileRecord {
        let document = Html::parse_document(html_content);
        self.assemble(&document.root_element(), profile_url)
    }

    /// Extracts name, headline, experience and education, in that order.
    pub fn assemble<N: DocumentNode>(&self, document: &N, profile_url: &str) -> ProfileRecord {
        tracing::info!("Scraping profile: {}", profile_url);

        let name = fields::extract(document, &fields::NAME);
        if name.is_none() {
            tracing::warn!("Could not extract name with any of the selectors");
        }
        let headline = fields::extract(document, &fields::HEADLINE);
        if headline.is_none() {
            tracing::warn!("Could not extract headline with any of the selectors");
        }

        let record = ProfileRecordBuilder::new(profile_url)
            .name(name)
            .headline(headline)
            .experiences(section_entries::<ExperienceEntry, N>(document))
            .education(section_entries::<EducationEntry, N>(document))
            .build();

        tracing::info!(
            "Finished scraping profile {}: {} experiences, {} education entries",
            profile_url,
            record.experiences().len(),
            record.education().len()
        );
        record
    }
}

/// Locates `E`'s section, enumerates its items and keeps every entry that
/// has at least one non-empty field.
fn section_entries<E: SectionEntry, N: DocumentNode>(document: &N) -> Vec<E> {
    let label = E::SECTION;
    tracing::info!("Attempting to extract {} section", label);

    let Some(section) = section::locate(document, label) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for (index, node) in items::enumerate(&section).iter().enumerate() {
        tracing::trace!(
            "{} item {} HTML: {}...",
            label,
            index + 1,
            snippet(&node.outer_html(), ENTRY_LOG_SNIPPET)
        );
        let entry = E::from_node(node);
        if entry.is_blank() {
            tracing::warn!("Skipping empty {} item {}", label, index + 1);
            continue;
        }
        tracing::info!(
            "Added {} item {}: {}",
            label,
            index + 1,
            serde_json::to_string(&entry).unwrap_or_default()
        );
        entries.push(entry);
    }
    entries
}
