// src/source/snapshot.rs
use crate::source::{profile_handle, DocumentSource, FetchedDocument};
use crate::utils::error::SourceError;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Serves previously saved pages from `<dir>/<handle>.html`.
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, profile_url: &str) -> PathBuf {
        self.dir.join(format!("{}.html", profile_handle(profile_url)))
    }
}

impl DocumentSource for SnapshotSource {
    async fn fetch(&self, profile_url: &str) -> Result<FetchedDocument, SourceError> {
        let path = self.path_for(profile_url);
        tracing::info!("Reading snapshot {} for {}", path.display(), profile_url);

        let html = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io(e),
        })?;

        Ok(FetchedDocument {
            final_url: profile_url.to_string(),
            html,
        })
    }
}
