//! Undo/redo for the script buffer.
//!
//! ## Learning: Storing Edits, Not Snapshots
//!
//! Every step keeps only the text that changed and where. Undo applies the
//! inverse of each edit, so a long script costs no more to undo than a short
//! one.
//!
//! A snapshot sync may produce a delete followed by an insert (typing over a
//! selection). Both land in one [`EditGroup`] so a single undo reverts the
//! whole replacement.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// Text inserted at, or removed from, a char position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    /// Char index in the buffer
    pub position: usize,
    pub content: String,
}

impl Edit {
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::new(EditKind::Insert, position, content)
    }

    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self::new(EditKind::Delete, position, content)
    }

    fn new(kind: EditKind, position: usize, content: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            content: content.into(),
        }
    }

    /// The edit that cancels this one.
    pub fn inverse(&self) -> Self {
        let kind = match self.kind {
            EditKind::Insert => EditKind::Delete,
            EditKind::Delete => EditKind::Insert,
        };
        Self::new(kind, self.position, self.content.clone())
    }

    /// Number of characters this edit covers.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// True when `next` continues this edit within one line: typing to the
    /// right, backspacing to the left, or deleting forward in place.
    pub fn can_coalesce(&self, next: &Edit) -> bool {
        let single_line = !self.content.contains('\n') && !next.content.contains('\n');
        if self.kind != next.kind || !single_line {
            return false;
        }

        match self.kind {
            EditKind::Insert => next.position == self.position + self.char_len(),
            EditKind::Delete => {
                next.position + next.char_len() == self.position || next.position == self.position
            }
        }
    }

    /// Merges `next` into this edit. Only valid after [`Edit::can_coalesce`].
    pub fn coalesce(&mut self, next: Edit) {
        if self.kind == EditKind::Delete && next.position < self.position {
            self.content.insert_str(0, &next.content);
            self.position = next.position;
        } else {
            self.content.push_str(&next.content);
        }
    }
}

/// A group of edits that are undone/redone together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// The edits in application order
    pub edits: Vec<Edit>,
    /// When this group was last extended; `None` blocks coalescing
    pub timestamp: Option<Instant>,
}

impl EditGroup {
    fn new(edits: Vec<Edit>) -> Self {
        Self {
            edits,
            timestamp: Some(Instant::now()),
        }
    }

    fn single_mut(&mut self) -> Option<&mut Edit> {
        match self.edits.as_mut_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Bounded undo and redo stacks.
///
/// Rapid single-character typing on one line collapses into one step.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<EditGroup>,
    redo_stack: Vec<EditGroup>,
    /// Oldest steps are dropped beyond this
    max_size: usize,
    coalesce_window: Duration,
}

impl History {
    /// Creates a new history with the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(1024)),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            coalesce_window: Duration::from_millis(300),
        }
    }

    /// Sets the coalescing window. `Duration::ZERO` disables coalescing.
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    /// Pushes a single edit, coalescing with the previous one when possible.
    pub fn push(&mut self, edit: Edit) {
        self.push_group(vec![edit]);
    }

    /// Pushes several edits as one undo step.
    ///
    /// Clears the redo stack (no branching history).
    pub fn push_group(&mut self, mut edits: Vec<Edit>) {
        if edits.is_empty() {
            return;
        }
        self.redo_stack.clear();

        if edits.len() == 1 && !self.coalesce_window.is_zero() {
            if let Some(last_group) = self.undo_stack.back_mut() {
                let fresh = last_group
                    .timestamp
                    .is_some_and(|t| t.elapsed() < self.coalesce_window);
                if fresh {
                    if let Some(last_edit) = last_group.single_mut() {
                        if last_edit.can_coalesce(&edits[0]) {
                            last_edit.coalesce(edits.remove(0));
                            last_group.timestamp = Some(Instant::now());
                            return;
                        }
                    }
                }
            }
        }

        self.undo_stack.push_back(EditGroup::new(edits));

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Pops the last undo step.
    ///
    /// Returns its edits in application order; the caller reverses them
    /// back to front.
    pub fn undo(&mut self) -> Option<Vec<Edit>> {
        let mut group = self.undo_stack.pop_back()?;
        group.timestamp = None;
        let edits = group.edits.clone();
        self.redo_stack.push(group);
        Some(edits)
    }

    /// Pops the last redo step, returning its edits in application order.
    pub fn redo(&mut self) -> Option<Vec<Edit>> {
        let group = self.redo_stack.pop()?;
        let edits = group.edits.clone();
        // No timestamp, so the next keystroke starts a fresh step
        self.undo_stack.push_back(group);
        Some(edits)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_inverse() {
        let insert = Edit::insert(0, "hello");
        let inverse = insert.inverse();

        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.position, 0);
        assert_eq!(inverse.content, "hello");
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new(100).with_coalesce_window(Duration::ZERO);

        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "b"));
        assert_eq!(history.undo_count(), 2);

        let edits = history.undo().unwrap();
        assert_eq!(edits, vec![Edit::insert(1, "b")]);

        assert!(history.can_redo());
        let edits = history.redo().unwrap();
        assert_eq!(edits[0].content, "b");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_typing_coalesces_into_one_step() {
        let mut history = History::new(100);
        history.push(Edit::insert(0, "p"));
        history.push(Edit::insert(1, "r"));
        history.push(Edit::insert(2, "i"));

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.undo().unwrap()[0].content, "pri");
    }

    #[test]
    fn test_newline_breaks_coalescing() {
        let mut history = History::new(100);
        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "\n"));
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_group_is_undone_together() {
        let mut history = History::new(100);
        history.push_group(vec![Edit::delete(0, "old"), Edit::insert(0, "new")]);

        let edits = history.undo().unwrap();
        assert_eq!(edits.len(), 2);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new(100).with_coalesce_window(Duration::ZERO);
        history.push(Edit::insert(0, "a"));
        history.undo();
        assert!(history.can_redo());

        history.push(Edit::insert(0, "b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut history = History::new(2).with_coalesce_window(Duration::ZERO);
        history.push(Edit::insert(0, "a\n"));
        history.push(Edit::insert(2, "b\n"));
        history.push(Edit::insert(4, "c\n"));
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_backspace_coalescing() {
        let mut e1 = Edit::delete(4, "o");
        let e2 = Edit::delete(3, "l");

        assert!(e1.can_coalesce(&e2));
        e1.coalesce(e2);
        assert_eq!(e1.content, "lo");
        assert_eq!(e1.position, 3);
    }
}
