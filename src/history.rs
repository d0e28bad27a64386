//! File-backed history store
//!
//! Persists assessment entries as a single pretty-printed JSON array, newest
//! first, capped at a configurable number of entries, plus the uploaded
//! images alongside it. The full list is kept in memory behind a lock and
//! the file is rewritten on every append; a corrupt file resets to empty
//! rather than failing the service.

use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::HistoryEntry;

pub struct HistoryStore {
    history_file: PathBuf,
    images_dir: PathBuf,
    limit: usize,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Open (or create) the store rooted at `storage_dir`.
    pub fn open(storage_dir: &Path, limit: usize) -> io::Result<Self> {
        let images_dir = storage_dir.join("images");
        fs::create_dir_all(&images_dir)?;

        let history_file = storage_dir.join("history.json");
        let entries = Self::load_entries(&history_file);

        Ok(Self {
            history_file,
            images_dir,
            limit,
            entries: RwLock::new(entries),
        })
    }

    fn load_entries(path: &Path) -> Vec<HistoryEntry> {
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("History file corrupt, resetting: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read history file, resetting: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend an entry, trim to the cap, and rewrite the file.
    pub fn append(&self, entry: HistoryEntry) -> io::Result<()> {
        let mut entries = self.entries.write();
        entries.insert(0, entry);
        entries.truncate(self.limit);

        let json = serde_json::to_string_pretty(&*entries)?;
        fs::write(&self.history_file, json)
    }

    /// Most recent entry, if any
    pub fn latest(&self) -> Option<HistoryEntry> {
        self.entries.read().first().cloned()
    }

    /// Snapshot of all entries, newest first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn save_image(&self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.images_dir.join(filename), bytes)
    }

    /// Resolve a stored image path. Names containing path separators or
    /// parent references are rejected, as are files that do not exist.
    pub fn image_path(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        let path = self.images_dir.join(filename);
        path.is_file().then_some(path)
    }
}
