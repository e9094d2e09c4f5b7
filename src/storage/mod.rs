// src/storage/mod.rs
use crate::models::{ProfileRecord, ProfileRow};
use crate::utils::error::StorageError;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const ROWS_FILE: &str = "profiles.jsonl";
pub const METADATA_FILE: &str = "profiles_meta.json";
const DEBUG_DIR: &str = "debug";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn rows_path(&self) -> PathBuf {
        self.base_dir.join(ROWS_FILE)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.base_dir.join(DEBUG_DIR)
    }

    /// Writes one JSON row per record, in batch order.
    pub fn save_records(&self, records: &[ProfileRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.rows_path();
        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;

        for record in records {
            let row = ProfileRow::from_record(record)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            let line = serde_json::to_string(&row)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            writeln!(file, "{}", line).map_err(StorageError::IoError)?;
        }

        tracing::info!("Saved {} profile rows to {}", records.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the batch in JSON format
    pub fn save_batch_metadata(&self, records: &[ProfileRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(METADATA_FILE);

        let metadata = serde_json::json!({
            "record_count": records.len(),
            "named_record_count": records.iter().filter(|r| r.name().is_some()).count(),
            "experience_entries": records.iter().map(|r| r.experiences().len()).sum::<usize>(),
            "education_entries": records.iter().map(|r| r.education().len()).sum::<usize>(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Keeps a copy of a fetched page under `debug/<handle>.html`.
    pub fn save_page_snapshot(&self, handle: &str, html: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.debug_dir();
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }

        let file_path = target_dir.join(format!("{}.html", handle));
        fs::write(&file_path, html).map_err(StorageError::IoError)?;

        tracing::info!("Page source saved to {}", file_path.display());
        Ok(file_path)
    }
}

/// Reads rows written by [`StorageManager::save_records`]. Blank lines are skipped.
pub fn load_rows(path: &Path) -> Result<Vec<ProfileRow>, StorageError> {
    let file = fs::File::open(path).map_err(StorageError::IoError)?;
    let mut rows = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(StorageError::IoError)?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|e| StorageError::MalformedRow {
            line: index + 1,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    tracing::info!("Loaded {} profile rows from {}", rows.len(), path.display());
    Ok(rows)
}
