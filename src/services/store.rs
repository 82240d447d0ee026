//! CSV file store service
//!
//! Owns every filesystem operation against the storage directory with proper
//! error handling and filename validation. The storage root is injected at
//! construction time rather than read from the process working directory.

use crate::error::AppError;
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Allowed participant identifier pattern (letters, digits, underscore, hyphen)
static PARTICIPANT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("participant id pattern is valid"));

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// Generated filename, `{participant_id}_data_{timestamp}.csv`
    pub filename: String,
    /// Full path of the stored file under the storage root
    pub path: PathBuf,
}

/// CSV file store rooted at a single flat directory
///
/// All operations join validated filenames onto the injected root; nothing
/// outside the root is ever touched. Two uploads from the same participant
/// within the same second overwrite each other (last write wins).
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is not created here; it is created lazily by the first
    /// operation that needs it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root this store operates on
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a participant identifier against the allowed pattern
    ///
    /// # Returns
    /// * `Ok(())` - Identifier is valid
    /// * `Err(AppError::InvalidParticipantId)` - Identifier is empty or contains
    ///   characters outside `[A-Za-z0-9_-]`
    pub fn validate_participant_id(participant_id: &str) -> Result<(), AppError> {
        if PARTICIPANT_ID.is_match(participant_id) {
            Ok(())
        } else {
            Err(AppError::InvalidParticipantId)
        }
    }

    /// Reject filenames that could escape the storage root
    ///
    /// Caller-supplied filenames are interpolated into a filesystem path, so
    /// separators and `..` components must never pass. The reference service
    /// skipped this check; here it is mandatory.
    pub fn validate_filename(filename: &str) -> Result<(), AppError> {
        if filename.is_empty()
            || filename == "."
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(AppError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Persist one CSV payload for a participant
    ///
    /// Builds `{participant_id}_data_{YYYYMMDD_HHMMSS}.csv` from the current
    /// local time and writes the payload verbatim, overwriting any file of the
    /// same name.
    ///
    /// # Arguments
    /// * `participant_id` - Validated against the allowed pattern
    /// * `csv_data` - Raw CSV text, stored without inspection
    ///
    /// # Returns
    /// * `Ok(SavedFile)` - Generated filename and full storage path
    /// * `Err(AppError)` - Invalid participant id, empty payload, or I/O failure
    pub async fn save(&self, participant_id: &str, csv_data: &str) -> Result<SavedFile, AppError> {
        if csv_data.is_empty() {
            return Err(AppError::EmptyCsvData);
        }
        Self::validate_participant_id(participant_id)?;

        self.ensure_root().await?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_data_{}.csv", participant_id, timestamp);
        let path = self.root.join(&filename);

        fs::write(&path, csv_data).await?;

        Ok(SavedFile { filename, path })
    }

    /// List all filenames in the storage directory, sorted ascending
    ///
    /// A missing storage directory is not an error; it reads as empty.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            files.push(entry.file_name().to_string_lossy().to_string());
        }

        files.sort();
        Ok(files)
    }

    /// Read a stored CSV file for download
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - Raw file bytes
    /// * `Err(AppError::InvalidFileType)` - Filename does not end in `.csv`
    /// * `Err(AppError::InvalidFilename)` - Filename could escape the root
    /// * `Err(AppError::FileNotFound)` - No such file in the storage directory
    pub async fn open(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        if !filename.ends_with(".csv") {
            return Err(AppError::InvalidFileType);
        }
        Self::validate_filename(filename)?;

        let path = self.root.join(filename);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::FileNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file
    ///
    /// A missing file reports `FileNotFound` rather than a server error; any
    /// other removal failure surfaces as an I/O error.
    pub async fn remove(&self, filename: &str) -> Result<(), AppError> {
        Self::validate_filename(filename)?;

        let path = self.root.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::FileNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_round_trip() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let saved = store
            .save("P001", "trial,rt\n1,532\n")
            .await
            .expect("Failed to save upload");

        assert!(saved.filename.starts_with("P001_data_"));
        assert!(saved.filename.ends_with(".csv"));
        let on_disk = std::fs::read_to_string(&saved.path).expect("Failed to read stored file");
        assert_eq!(on_disk, "trial,rt\n1,532\n");
    }

    #[tokio::test]
    async fn test_save_empty_payload_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let result = store.save("P001", "").await;
        assert!(matches!(result.unwrap_err(), AppError::EmptyCsvData));
        assert!(store.list().await.unwrap().is_empty(), "No file should be created");
    }

    #[tokio::test]
    async fn test_save_traversal_participant_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let result = store.save("../../etc", "a,b\n").await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidParticipantId));
        assert!(store.list().await.unwrap().is_empty(), "No file should be created");
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("never_created"));

        let files = store.list().await.expect("Missing root should not error");
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        store.save("B002", "x\n").await.expect("Failed to save");
        store.save("A001", "y\n").await.expect("Failed to save");

        let files = store.list().await.expect("Failed to list");
        assert_eq!(files.len(), 2);
        assert!(files[0].starts_with("A001_"));
        assert!(files[1].starts_with("B002_"));
    }

    #[tokio::test]
    async fn test_open_round_trip() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let saved = store.save("P001", "a,b\n1,2\n").await.expect("Failed to save");
        let bytes = store.open(&saved.filename).await.expect("Failed to open");
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let result = store.open("absent.csv").await;
        assert!(matches!(result.unwrap_err(), AppError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_open_wrong_extension() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("notes.txt"), "text").expect("Failed to write file");

        let result = store.open("notes.txt").await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidFileType));
    }

    #[tokio::test]
    async fn test_open_traversal_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let outside = temp_dir.path().join("secret.csv");
        std::fs::write(&outside, "secret").expect("Failed to write file");

        let store = CsvStore::new(temp_dir.path().join("data"));
        let result = store.open("../secret.csv").await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidFilename(_)));
    }

    #[tokio::test]
    async fn test_remove_then_remove_again() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let saved = store.save("P001", "a\n").await.expect("Failed to save");
        store.remove(&saved.filename).await.expect("Failed to remove");
        assert!(store.list().await.unwrap().is_empty());

        let result = store.remove(&saved.filename).await;
        assert!(matches!(result.unwrap_err(), AppError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_traversal_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path());

        let result = store.remove("../oops.csv").await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidFilename(_)));
    }

    #[test]
    fn test_validate_participant_id_patterns() {
        assert!(CsvStore::validate_participant_id("P001").is_ok());
        assert!(CsvStore::validate_participant_id("sub_01-a").is_ok());
        assert!(CsvStore::validate_participant_id("unknown").is_ok());
        assert!(CsvStore::validate_participant_id("").is_err());
        assert!(CsvStore::validate_participant_id("p 1").is_err());
        assert!(CsvStore::validate_participant_id("../../etc").is_err());
        assert!(CsvStore::validate_participant_id("a/b").is_err());
    }

    #[test]
    fn test_validate_filename_patterns() {
        assert!(CsvStore::validate_filename("P001_data_20250101_120000.csv").is_ok());
        assert!(CsvStore::validate_filename("").is_err());
        assert!(CsvStore::validate_filename("a/b.csv").is_err());
        assert!(CsvStore::validate_filename("a\\b.csv").is_err());
        assert!(CsvStore::validate_filename("..").is_err());
        assert!(CsvStore::validate_filename("../up.csv").is_err());
    }
}
