// src/source/mod.rs
//! Where profile documents come from.
//!
//! Sources only hand back page text and the URL the page was finally served
//! from; deciding whether that page is usable is the batch layer's job.
pub mod client;
pub mod snapshot;

pub use client::HttpSource;
pub use snapshot::SnapshotSource;

use crate::utils::error::SourceError;

/// A fetched page, ready to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// URL after redirects; differs from the requested one on auth walls.
    pub final_url: String,
    pub html: String,
}

#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    async fn fetch(&self, profile_url: &str) -> Result<FetchedDocument, SourceError>;
}

/// Short, file-name-safe handle for a profile URL: its last non-empty path
/// segment (`https://www.linkedin.com/in/akkshay/` gives `akkshay`).
pub fn profile_handle(profile_url: &str) -> String {
    let without_query = profile_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segment = without_query
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let handle: String = segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if handle.is_empty() {
        "profile".to_string()
    } else {
        handle
    }
}
