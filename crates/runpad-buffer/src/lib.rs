//! # Runpad Buffer
//!
//! The text behind the script pane.
//!
//! The editor widget owns its own cursor and layout state, so this crate does
//! not try to mirror keystrokes. Instead the widget hands over a full snapshot
//! after each edit and [`TextBuffer::sync`] turns the difference into a single
//! recorded edit. That keeps undo/redo and "unsaved changes" tracking in one
//! place that can be tested without a window.
//!
//! ## Key Concepts
//!
//! - `TextBuffer` owns the rope and its history
//! - Every mutation bumps a revision counter
//! - A save records the revision that was written, so edits made while an
//!   async save is in flight still count as unsaved

mod buffer;
mod history;

pub use buffer::TextBuffer;
pub use history::{Edit, EditKind, History};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Line {0} is out of bounds")]
    LineOutOfBounds(usize),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_buffer_from_string() {
        let buffer = TextBuffer::from("print('hi')\n");
        assert_eq!(buffer.len_chars(), 12);
        assert_eq!(buffer.text(), "print('hi')\n");
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        assert_eq!(buffer.text(), "Hello");

        buffer.insert(5, ", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        buffer.delete(5..7).unwrap();
        assert_eq!(buffer.text(), "HelloWorld!");
        assert_eq!(buffer.revision(), 3);
    }

    #[test]
    fn test_undo_redo_restores_text() {
        let mut buffer = TextBuffer::new();
        buffer.sync("x = 1\n");
        buffer.sync("x = 1\ny = 2\n");

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "x = 1\n");

        buffer.redo().unwrap();
        assert_eq!(buffer.text(), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_line_operations() {
        let buffer = TextBuffer::from("Line 1\nLine 2\nLine 3");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line(0).unwrap(), "Line 1\n");
        assert_eq!(buffer.line(2).unwrap(), "Line 3");
        assert!(matches!(buffer.line(3), Err(BufferError::LineOutOfBounds(3))));
    }
}
