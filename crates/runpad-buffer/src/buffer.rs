//! The rope-backed script text.
//!
//! ## Why Rope?
//!
//! Undo needs to splice text back at arbitrary positions, and the sync path
//! touches the buffer after every keystroke. Ropes give O(log n) splices
//! without copying the whole script each time.
//!
//! ## Learning: Revisions Instead of a Dirty Flag
//!
//! A boolean "modified" flag cannot tell which text a save wrote. The buffer
//! counts mutations instead; a save remembers the count it started from:
//!
//! ```rust
//! use runpad_buffer::TextBuffer;
//!
//! let mut buffer = TextBuffer::from("print(1)\n");
//! let written = buffer.revision();   // save starts here
//! buffer.insert(0, "# ").unwrap();   // edit while the save is in flight
//! buffer.mark_saved(written);
//! assert!(buffer.is_modified());
//! ```

use ropey::Rope;
use std::ops::Range;

use crate::history::{Edit, EditKind, History};
use crate::{BufferError, BufferResult};

/// Default number of undo steps kept per buffer.
const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// A text buffer backed by a rope, with undo history and save tracking.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync`. It lives on the UI thread; the
/// runner only ever sees a saved file on disk.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Edit history for undo/redo
    history: History,

    /// Bumped by every mutation, including undo and redo
    revision: u64,

    /// Revision last written to disk
    saved_revision: u64,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use runpad_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates an empty buffer keeping at most `limit` undo steps.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(limit),
            revision: 0,
            saved_revision: 0,
        }
    }

    /// Replaces the history policy, e.g. to disable coalescing.
    pub fn set_history(&mut self, history: History) {
        self.history = history;
    }

    // ==================== Text Access ====================

    /// Returns the entire text content as a `Cow<str>`.
    ///
    /// # Learning: Cow (Clone-on-Write)
    ///
    /// For small buffers, this returns a borrowed reference (cheap).
    /// For large buffers spanning multiple rope chunks, it allocates.
    #[inline]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its newline.
    pub fn line(&self, line_idx: usize) -> BufferResult<std::borrow::Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line_idx));
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        let edit = Edit::insert(char_idx, text);
        self.apply(&edit);
        self.history.push(edit);
        Ok(())
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.end > self.len_chars() || range.start > range.end {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        let edit = Edit::delete(range.start, deleted.clone());
        self.apply(&edit);
        self.history.push(edit);
        Ok(deleted)
    }

    /// Replaces text in a range with new text as a single undo step.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        if range.end > self.len_chars() || range.start > range.end {
            return Err(BufferError::InvalidCharIndex(range.end));
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        let mut edits = Vec::with_capacity(2);
        if !deleted.is_empty() {
            edits.push(Edit::delete(range.start, deleted.clone()));
        }
        if !text.is_empty() {
            edits.push(Edit::insert(range.start, text));
        }
        for edit in &edits {
            self.apply(edit);
        }
        self.history.push_group(edits);
        Ok(deleted)
    }

    /// Brings the buffer in line with a full snapshot of the editor text.
    ///
    /// Only the span between the common prefix and common suffix is
    /// replaced, so typing one character records a one-character edit.
    /// Returns the replaced range in the old text, or `None` when the
    /// snapshot matches the buffer.
    pub fn sync(&mut self, new_text: &str) -> Option<Range<usize>> {
        let old_len = self.len_chars();
        let new_len = new_text.chars().count();

        let prefix = self
            .rope
            .chars()
            .zip(new_text.chars())
            .take_while(|(a, b)| a == b)
            .count();

        if prefix == old_len && prefix == new_len {
            return None;
        }

        let old_text = self.text().into_owned();
        let max_suffix = old_len.min(new_len) - prefix;
        let suffix = old_text
            .chars()
            .rev()
            .zip(new_text.chars().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let removed = prefix..old_len - suffix;
        let inserted: String = new_text
            .chars()
            .skip(prefix)
            .take(new_len - suffix - prefix)
            .collect();

        // Both bounds come from the buffer itself, so this cannot fail.
        self.replace(removed.clone(), &inserted).ok()?;
        Some(removed)
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit group.
    ///
    /// # Learning: State Management
    ///
    /// Each step is stored in a history stack. Undo pops from the
    /// undo stack and pushes to the redo stack, then applies the
    /// inverse of every edit back to front.
    pub fn undo(&mut self) -> BufferResult<()> {
        let edits = self.history.undo().ok_or(BufferError::NothingToUndo)?;
        for edit in edits.iter().rev() {
            self.apply(&edit.inverse());
        }
        Ok(())
    }

    /// Redoes the last undone edit group.
    pub fn redo(&mut self) -> BufferResult<()> {
        let edits = self.history.redo().ok_or(BufferError::NothingToRedo)?;
        for edit in &edits {
            self.apply(edit);
        }
        Ok(())
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies an edit to the rope without touching history.
    fn apply(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => self.rope.insert(edit.position, &edit.content),
            EditKind::Delete => {
                let end = edit.position + edit.char_len();
                self.rope.remove(edit.position..end);
            }
        }
        self.revision += 1;
    }

    // ==================== Save Tracking ====================

    /// Current revision. Compare against a later value to detect edits.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true if the buffer changed since the last recorded save.
    pub fn is_modified(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Records that `revision` has been written to disk.
    ///
    /// Passing an older revision (the buffer was edited while the write
    /// was in flight) keeps the buffer marked as modified.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = revision;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = Rope::from_str(s);
        buffer
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn no_coalesce(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::from(text);
        buffer.set_history(History::new(100).with_coalesce_window(Duration::ZERO));
        buffer
    }

    #[test]
    fn test_sync_identical_is_noop() {
        let mut buffer = TextBuffer::from("abc");
        assert_eq!(buffer.sync("abc"), None);
        assert_eq!(buffer.revision(), 0);
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_sync_single_insert() {
        let mut buffer = TextBuffer::from("print()");
        let range = buffer.sync("print(1)").unwrap();
        assert_eq!(range, 6..6);
        assert_eq!(buffer.text(), "print(1)");
    }

    #[test]
    fn test_sync_repeated_characters() {
        // Prefix and suffix overlap on runs of the same character
        let mut buffer = TextBuffer::from("aaa");
        buffer.sync("aaaa");
        assert_eq!(buffer.text(), "aaaa");
        buffer.sync("aa");
        assert_eq!(buffer.text(), "aa");
    }

    #[test]
    fn test_sync_replacement_undoes_in_one_step() {
        let mut buffer = no_coalesce("name = 'old'\n");
        buffer.sync("name = 'new value'\n");
        assert_eq!(buffer.text(), "name = 'new value'\n");

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "name = 'old'\n");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_sync_multibyte() {
        let mut buffer = TextBuffer::from("привет");
        buffer.sync("привет, мир");
        assert_eq!(buffer.text(), "привет, мир");
        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "привет");
    }

    #[test]
    fn test_modified_tracking() {
        let mut buffer = TextBuffer::from("x");
        assert!(!buffer.is_modified());

        buffer.sync("xy");
        assert!(buffer.is_modified());

        let written = buffer.revision();
        buffer.sync("xyz");
        buffer.mark_saved(written);
        assert!(buffer.is_modified());

        buffer.mark_saved(buffer.revision());
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_invalid_ranges() {
        let mut buffer = TextBuffer::from("abc");
        assert!(matches!(buffer.insert(4, "x"), Err(BufferError::InvalidCharIndex(4))));
        assert!(buffer.delete(1..9).is_err());
        assert!(matches!(buffer.redo(), Err(BufferError::NothingToRedo)));
    }

    proptest! {
        #[test]
        fn sync_reproduces_snapshot(old in "[a-c\\n]{0,24}", new in "[a-c\\n]{0,24}") {
            let mut buffer = no_coalesce(&old);
            buffer.sync(&new);
            prop_assert_eq!(buffer.text(), new.as_str());

            if old != new {
                buffer.undo().unwrap();
                prop_assert_eq!(buffer.text(), old.as_str());
            }
        }
    }
}
