//! Best-effort persistence of recently opened files.
//!
//! Failures here never block editing: callers log them and carry on.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::{data_dir, RECENT_FILES_NAME};

/// Maximum number of entries kept.
pub const RECENT_FILES_CAP: usize = 10;

#[derive(Debug, Error)]
pub enum RecentFilesError {
    #[error("Recent files I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recent files are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque storage for the recent-files list.
pub trait RecentFilesStore {
    fn load(&self) -> Result<Vec<String>, RecentFilesError>;
    fn save(&self, files: &[String]) -> Result<(), RecentFilesError>;
}

/// Move `path` to the front of `files`, removing duplicates and keeping at
/// most `cap` entries.
pub fn push_recent(files: &mut Vec<String>, path: &str, cap: usize) {
    files.retain(|p| p != path);
    files.insert(0, path.to_string());
    files.truncate(cap);
}

/// A JSON array of paths in a single file.
#[derive(Debug, Clone)]
pub struct JsonRecentFiles {
    path: PathBuf,
}

impl JsonRecentFiles {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/recent_files.json`.
    pub fn default_location() -> Self {
        Self::new(data_dir().join(RECENT_FILES_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentFilesStore for JsonRecentFiles {
    /// A missing file is an empty list.
    fn load(&self) -> Result<Vec<String>, RecentFilesError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, files: &[String]) -> Result<(), RecentFilesError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(files)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store, for hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryRecentFiles {
    files: std::cell::RefCell<Vec<String>>,
}

impl MemoryRecentFiles {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            files: std::cell::RefCell::new(files),
        }
    }
}

impl RecentFilesStore for MemoryRecentFiles {
    fn load(&self) -> Result<Vec<String>, RecentFilesError> {
        Ok(self.files.borrow().clone())
    }

    fn save(&self, files: &[String]) -> Result<(), RecentFilesError> {
        *self.files.borrow_mut() = files.to_vec();
        Ok(())
    }
}

/// Load, push and save in one go.
///
/// An unparseable list is replaced rather than left to block every later
/// call. I/O errors still propagate.
pub fn record_recent(
    store: &dyn RecentFilesStore,
    path: &str,
    cap: usize,
) -> Result<Vec<String>, RecentFilesError> {
    let mut files = match store.load() {
        Ok(files) => files,
        Err(RecentFilesError::Json(e)) => {
            warn!("Discarding unreadable recent files: {}", e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    push_recent(&mut files, path, cap);
    store.save(&files)?;
    Ok(files)
}
