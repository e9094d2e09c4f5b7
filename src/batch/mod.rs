// src/batch/mod.rs
use crate::extractors::ProfileExtractor;
use crate::models::ProfileRecord;
use crate::source::{profile_handle, DocumentSource};
use crate::storage::StorageManager;
use crate::utils::html_debug::{create_debug_html, PROFILE_DEBUG_PATTERNS};

/// Used when no subjects are supplied at all.
pub const FALLBACK_PROFILE_URL: &str = "https://www.linkedin.com/in/akkshay/";

// Fragments of the final URL that mean we were bounced to a sign-in page.
const AUTH_WALL_MARKERS: &[&str] = &["login", "authwall"];

/// True when the page was served from a sign-in or auth-wall URL instead of
/// the profile itself.
pub fn is_auth_wall(final_url: &str) -> bool {
    AUTH_WALL_MARKERS.iter().any(|marker| final_url.contains(marker))
}

/// Parses a subject list: one profile URL per line, `#` starts a comment.
pub fn parse_subject_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetches and extracts every subject in order, producing exactly one record
/// per subject. Subjects that cannot be fetched, or that land on an auth
/// wall, get an empty record rather than stopping the batch.
///
/// With `debug` set, each fetched page is saved along with an annotated copy.
pub async fn scrape_profiles<S: DocumentSource>(
    source: &S,
    subjects: &[String],
    extractor: &ProfileExtractor,
    debug: Option<&StorageManager>,
) -> Vec<ProfileRecord> {
    let mut records = Vec::with_capacity(subjects.len());

    for (index, profile_url) in subjects.iter().enumerate() {
        tracing::info!("Processing profile {}/{}: {}", index + 1, subjects.len(), profile_url);

        let document = match source.fetch(profile_url).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Error scraping {}: {}", profile_url, e);
                records.push(ProfileRecord::empty(profile_url));
                continue;
            }
        };
        tracing::info!("Current URL after navigation: {}", document.final_url);

        if let Some(storage) = debug {
            save_debug_copies(storage, profile_url, &document.html);
        }

        if is_auth_wall(&document.final_url) {
            tracing::error!("Redirected to login page. Session may have expired.");
            records.push(ProfileRecord::empty(profile_url));
            continue;
        }

        let record = extractor.extract_profile(&document.html, profile_url);
        match record.name() {
            Some(name) => tracing::info!(
                "Successfully scraped: {} ({}) | {}",
                name,
                record.headline().unwrap_or("no headline"),
                record.profile_url()
            ),
            None => tracing::warn!("Scraped profile with no name: {}", record.profile_url()),
        }
        records.push(record);
    }

    records
}

fn save_debug_copies(storage: &StorageManager, profile_url: &str, html: &str) {
    let handle = profile_handle(profile_url);
    if let Err(e) = storage.save_page_snapshot(&handle, html) {
        tracing::warn!("Failed to save page snapshot for {}: {}", profile_url, e);
        return;
    }
    let annotated = storage.debug_dir().join(format!("{}_annotated.html", handle));
    if let Err(e) = create_debug_html(html, &annotated, PROFILE_DEBUG_PATTERNS) {
        tracing::warn!("Failed to create debug HTML: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use crate::models::ProfileRow;
    use crate::source::FetchedDocument;
    use crate::utils::error::SourceError;
    use std::collections::HashMap;

    /// In-memory source: URL -> (final URL, html); unknown URLs are not found.
    struct FixtureSource {
        pages: HashMap<String, (String, String)>,
    }

    impl DocumentSource for FixtureSource {
        async fn fetch(&self, profile_url: &str) -> Result<FetchedDocument, SourceError> {
            let (final_url, html) = self
                .pages
                .get(profile_url)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(profile_url.to_string()))?;
            Ok(FetchedDocument { final_url, html })
        }
    }

    fn profile_page(name: &str, jobs: usize, school: &str) -> String {
        let items: String = (0..jobs)
            .map(|i| format!(r#"<li class="artdeco-list__item"><div>Role {}</div><div>Company {}</div></li>"#, i, i))
            .collect();
        format!(
            r#"<html><body>
            <h1 class="text-heading-xlarge">{name}</h1>
            <section class="artdeco-card"><h2>Experience</h2><ul>{items}</ul></section>
            <section class="artdeco-card"><h2>Education</h2><ul>
              <li class="artdeco-list__item"><div>{school}</div><div>BS</div></li>
            </ul></section>
            </body></html>"#
        )
    }

    fn fixture() -> (FixtureSource, Vec<String>) {
        let a = "https://www.linkedin.com/in/a/".to_string();
        let b = "https://www.linkedin.com/in/b/".to_string();
        let c = "https://www.linkedin.com/in/c/".to_string();
        let mut pages = HashMap::new();
        pages.insert(a.clone(), (a.clone(), profile_page("Alice", 2, "MIT")));
        pages.insert(
            b.clone(),
            (
                "https://www.linkedin.com/authwall?trk=profile".to_string(),
                "<html><body><h1 class=\"text-heading-xlarge\">Join now</h1></body></html>".to_string(),
            ),
        );
        pages.insert(c.clone(), (c.clone(), profile_page("Carol", 1, "MIT")));
        (FixtureSource { pages }, vec![a, b, c])
    }

    #[test]
    fn one_record_per_subject_even_when_malformed() {
        let (source, subjects) = fixture();
        let records = tokio_test::block_on(scrape_profiles(&source, &subjects, &ProfileExtractor::new(), None));

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name(), Some("Alice"));
        assert!(records[1].is_empty(), "auth wall page must not be extracted");
        assert_eq!(records[1].profile_url(), subjects[1]);
        assert_eq!(records[2].name(), Some("Carol"));

        let rows: Vec<ProfileRow> = records.iter().map(|r| ProfileRow::from_record(r).unwrap()).collect();
        let summary = summarize(&rows);
        assert_eq!(summary.total_records, 3);
        assert!((summary.avg_experiences - 1.0).abs() < 1e-9);
        assert!((summary.avg_educations - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.school_counts[0].count, 2);
        assert_eq!(summary.subjects[1].num_experiences, 0);
    }

    #[test]
    fn fetch_failures_become_empty_records() {
        let (source, _) = fixture();
        let subjects = vec!["https://www.linkedin.com/in/missing/".to_string()];
        let records = tokio_test::block_on(scrape_profiles(&source, &subjects, &ProfileExtractor::new(), None));

        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
    }

    #[test]
    fn debug_mode_saves_pages() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let (source, subjects) = fixture();

        tokio_test::block_on(scrape_profiles(&source, &subjects[..1], &ProfileExtractor::new(), Some(&storage)));

        assert!(storage.debug_dir().join("a.html").exists());
        assert!(storage.debug_dir().join("a_annotated.html").exists());
    }

    #[test]
    fn auth_wall_detection() {
        assert!(is_auth_wall("https://www.linkedin.com/authwall?trk=1"));
        assert!(is_auth_wall("https://www.linkedin.com/login?session_redirect=x"));
        assert!(!is_auth_wall("https://www.linkedin.com/in/someone/"));
    }

    #[test]
    fn subject_list_skips_comments_and_blanks() {
        let text = "# founders\nhttps://www.linkedin.com/in/a/\n\n  https://www.linkedin.com/in/b/  # second\n";
        assert_eq!(
            parse_subject_list(text),
            vec!["https://www.linkedin.com/in/a/", "https://www.linkedin.com/in/b/"]
        );
    }
}
