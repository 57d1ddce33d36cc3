//! The output pane's content.
//!
//! Child output arrives in arbitrary chunks: half a line, three lines and a
//! fragment, a prompt with no newline. The transcript stitches chunks back
//! into lines and remembers what each line was (program output, an error,
//! a prompt, or text the user typed) so the view can color them.

use std::collections::VecDeque;

/// What produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Start/finish markers written by the editor
    Banner,
    Stdout,
    Stderr,
    /// Text the script printed while waiting for input
    Prompt,
    /// Text the user sent to the script
    Input,
    /// Failures of the editor itself (launch errors, broken pipes)
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

/// Bounded list of output lines.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
    /// The last line has not seen its newline yet
    open: bool,
    max_lines: usize,
    dropped: usize,
}

impl Transcript {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            open: false,
            max_lines: max_lines.max(1),
            dropped: 0,
        }
    }

    /// Appends a chunk of streamed text.
    ///
    /// Continues the last line when it is unterminated and of the same
    /// kind; `\r\n` is treated as `\n`.
    pub fn push(&mut self, kind: LineKind, text: &str) {
        if text.is_empty() {
            return;
        }

        let text = text.replace("\r\n", "\n");
        let mut pieces = text.split('\n').peekable();

        while let Some(piece) = pieces.next() {
            let terminated = pieces.peek().is_some();
            // A trailing '\n' yields an empty last piece; it only closes the line
            if !terminated && piece.is_empty() {
                break;
            }

            match self.lines.back_mut() {
                Some(last) if self.open && last.kind == kind => last.text.push_str(piece),
                _ => self.append(kind, piece.to_string()),
            }
            self.open = !terminated;
        }

        self.trim();
    }

    /// Appends a complete line of its own, closing any open line.
    pub fn push_line(&mut self, kind: LineKind, text: &str) {
        for line in text.replace("\r\n", "\n").trim_end_matches('\n').split('\n') {
            self.append(kind, line.to_string());
        }
        self.open = false;
        self.trim();
    }

    /// Appends a banner line such as `=== Running hello.py ===`.
    pub fn banner(&mut self, text: &str) {
        self.push_line(LineKind::Banner, &format!("=== {} ===", text));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.open = false;
        self.dropped = 0;
    }

    pub fn lines(&self) -> impl Iterator<Item = &TranscriptLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines discarded because the transcript was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Everything, one line per row, for the clipboard.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }

    fn append(&mut self, kind: LineKind, text: String) {
        self.lines.push_back(TranscriptLine { kind, text });
    }

    fn trim(&mut self) {
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
            self.dropped += 1;
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(5000)
    }
}
