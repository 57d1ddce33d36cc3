//! The script being edited.
//!
//! ## Learning: Composition over Inheritance
//!
//! `Document` composes a `TextBuffer` and adds what only a file has: a path,
//! a display name and the notion of "saved". The UI keeps its widget state
//! separately and pushes snapshots in through [`Document::sync_text`].

use runpad_buffer::TextBuffer;
use std::path::{Path, PathBuf};

use crate::{CoreError, CoreResult};

/// Application name used in window titles.
pub const APP_NAME: &str = "Runpad";

/// A single script open in the editor.
#[derive(Debug, Clone)]
pub struct Document {
    /// The underlying text buffer
    buffer: TextBuffer,

    /// File path (None for untitled documents)
    path: Option<PathBuf>,

    /// Display name
    name: String,
}

impl Document {
    /// Creates a new empty, untitled document.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            path: None,
            name: "Untitled".to_string(),
        }
    }

    /// Creates an untitled document with initial text.
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from(text),
            ..Self::new()
        }
    }

    /// Creates a document for text already read from `path`.
    pub fn opened(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        Self {
            buffer: TextBuffer::from(text),
            name: display_name(&path),
            path: Some(path),
        }
    }

    /// Opens a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::opened(path, &text))
    }

    /// Reads a script without blocking the caller's thread.
    pub async fn load(path: PathBuf) -> CoreResult<(PathBuf, String)> {
        let text = tokio::fs::read_to_string(&path).await?;
        tracing::debug!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok((path, text))
    }

    // ==================== Getters ====================

    /// Returns the file path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all text.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.buffer.text()
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the line count.
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Current buffer revision, to be handed back to [`Document::mark_saved`].
    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Untitled or modified: running it requires a save first.
    pub fn needs_save(&self) -> bool {
        self.path.is_none() || self.is_modified()
    }

    /// Window title, e.g. `/tmp/hello.py * - Runpad`.
    pub fn title(&self) -> String {
        let marker = if self.is_modified() { " *" } else { "" };
        match &self.path {
            Some(path) => format!("{}{} - {}", path.display(), marker, APP_NAME),
            None => format!("{}{} - {}", self.name, marker, APP_NAME),
        }
    }

    // ==================== Editing ====================

    /// Records a snapshot of the editor text. Returns true if it changed.
    pub fn sync_text(&mut self, text: &str) -> bool {
        self.buffer.sync(text).is_some()
    }

    /// Undoes the last edit step.
    pub fn undo(&mut self) -> CoreResult<()> {
        Ok(self.buffer.undo()?)
    }

    /// Redoes the last undone edit step.
    pub fn redo(&mut self) -> CoreResult<()> {
        Ok(self.buffer.redo()?)
    }

    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.buffer.can_redo()
    }

    // ==================== File Operations ====================

    /// Saves the document to its path.
    pub fn save(&mut self) -> CoreResult<()> {
        let path = self.path.clone().ok_or(CoreError::NoPath)?;
        self.save_as(path)
    }

    /// Saves the document to a new path.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let revision = self.revision();
        write_atomic(path, self.text().as_bytes())?;
        self.mark_saved(path, revision);
        Ok(())
    }

    /// Records a finished save of `revision` to `path`.
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>, revision: u64) {
        let path = path.into();
        self.name = display_name(&path);
        self.path = Some(path);
        self.buffer.mark_saved(revision);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `text` to `path` through a sibling temp file and a rename.
pub async fn write_text(path: PathBuf, text: String) -> CoreResult<PathBuf> {
    let temp = temp_path(&path);
    tokio::fs::write(&temp, text.as_bytes()).await?;
    tokio::fs::rename(&temp, &path).await?;
    tracing::info!("Saved {}", path.display());
    Ok(path)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp = temp_path(path);
    std::fs::write(&temp, bytes)?;
    std::fs::rename(&temp, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".runpad-tmp");
    path.with_file_name(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
