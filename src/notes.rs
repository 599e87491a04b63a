//! Locally persisted study notes: add, delete, and plain-text export.
//!
//! The store owns the full note list, most-recent-first. Every successful
//! mutation rewrites the whole list to a fixed JSON store file; the file is
//! read exactly once, when the store is opened. An in-memory mode backs
//! unit tests without touching disk.

use crate::models::Note;
use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Fixed store file name inside the data directory.
pub const STORE_FILE_NAME: &str = "newsKattaNotes.json";

/// Fixed name of the exported plain-text file.
pub const EXPORT_FILE_NAME: &str = "NewsKatta_Notes.txt";

/// Separator line ending each exported note block.
const EXPORT_SEPARATOR: &str = "-------------------";

/// The note list, loaded once and re-persisted on every mutation.
#[derive(Debug)]
pub struct NoteStore {
    notes: Vec<Note>,
    path: Option<PathBuf>,
}

impl NoteStore {
    /// A store with no backing file. Mutations skip persistence.
    pub fn in_memory() -> Self {
        Self {
            notes: Vec::new(),
            path: None,
        }
    }

    /// Open the store under `data_dir`, loading any existing note list.
    ///
    /// A missing store file is a first run and yields an empty list;
    /// a present but unreadable one is an error.
    #[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
    pub fn open(data_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let path = data_dir.join(STORE_FILE_NAME);
        let notes = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let notes: Vec<Note> = serde_json::from_str(&raw)?;
            info!(count = notes.len(), "Loaded saved notes");
            notes
        } else {
            debug!("No note store file yet");
            Vec::new()
        };
        Ok(Self {
            notes,
            path: Some(path),
        })
    }

    /// Current notes, most-recent-first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Prepend a note for `headline`, stamped with the current time.
    ///
    /// Empty or whitespace-only text is rejected as a no-op. Duplicates are
    /// allowed. Returns whether a note was added.
    pub fn add(&mut self, text: &str, headline: &str) -> Result<bool, Box<dyn Error>> {
        let text = text.trim();
        if text.is_empty() {
            warn!("Ignoring empty note");
            return Ok(false);
        }

        self.notes.insert(
            0,
            Note {
                text: text.to_string(),
                headline: headline.to_string(),
                created_at: Local::now().format("%-d %b, %H:%M").to_string(),
            },
        );
        self.persist()?;
        Ok(true)
    }

    /// Delete the note at `index`; out-of-range is a no-op.
    ///
    /// Returns whether a note was removed.
    pub fn remove(&mut self, index: usize) -> Result<bool, Box<dyn Error>> {
        if index >= self.notes.len() {
            warn!(index, count = self.notes.len(), "Note index out of range");
            return Ok(false);
        }
        self.notes.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Render every note as a fixed text block, in current list order.
    ///
    /// Returns `None` when the store is empty so the caller can warn the
    /// user instead of silently producing an empty file.
    pub fn export_as_text(&self) -> Option<String> {
        if self.notes.is_empty() {
            return None;
        }
        let blocks: String = self
            .notes
            .iter()
            .map(|n| {
                format!(
                    "Date: {}\nTopic: {}\nNote: {}\n{}\n",
                    n.created_at, n.headline, n.text, EXPORT_SEPARATOR
                )
            })
            .collect();
        Some(blocks)
    }

    /// Write the export file into `dir`.
    ///
    /// Returns the written path, or `None` when there was nothing to export.
    #[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
    pub fn export_to_file(&self, dir: &Path) -> Result<Option<PathBuf>, Box<dyn Error>> {
        let Some(content) = self.export_as_text() else {
            return Ok(None);
        };
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, content)?;
        info!(path = %path.display(), count = self.notes.len(), "Exported notes");
        Ok(Some(path))
    }

    /// Rewrite the full list to the store file, when one is configured.
    fn persist(&self) -> Result<(), Box<dyn Error>> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string(&self.notes)?;
        fs::write(path, json)?;
        debug!(count = self.notes.len(), "Persisted note list");
        Ok(())
    }
}
