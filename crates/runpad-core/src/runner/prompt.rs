//! Turning a raw output stream into output chunks and input prompts.
//!
//! A script that calls `input("Name: ")` prints `Name: ` without a newline
//! and then blocks on stdin. Nothing in the pipe says "I am waiting"; the
//! best signal available is a fragment that stops growing. Complete lines
//! are also checked against the older heuristic (`...input...:`), which
//! catches scripts that print their question on its own line.

use crate::config::PromptConfig;

/// A classified piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detected {
    Output(String),
    Prompt(String),
}

/// Splits streamed text into lines and decides which ones are prompts.
#[derive(Debug)]
pub struct PromptDetector {
    config: PromptConfig,
    markers: Vec<String>,
    pending: String,
}

impl PromptDetector {
    pub fn new(config: PromptConfig) -> Self {
        let markers = config.markers.iter().map(|m| m.to_lowercase()).collect();
        Self {
            config,
            markers,
            pending: String::new(),
        }
    }

    /// True while an unterminated fragment is being held back.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feeds decoded text, returning every complete line classified.
    ///
    /// Consecutive output lines are merged into one chunk.
    pub fn feed(&mut self, text: &str) -> Vec<Detected> {
        let mut out = Vec::new();
        self.pending.push_str(text);

        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            if self.is_prompt_line(&line) {
                out.push(Detected::Prompt(line));
            } else {
                match out.last_mut() {
                    Some(Detected::Output(chunk)) => chunk.push_str(&line),
                    _ => out.push(Detected::Output(line)),
                }
            }
        }

        out
    }

    /// Called after the stream has been quiet for the idle period.
    pub fn idle(&mut self) -> Option<Detected> {
        if self.pending.is_empty() {
            return None;
        }
        let fragment = std::mem::take(&mut self.pending);
        if self.config.idle_prompt {
            Some(Detected::Prompt(fragment))
        } else {
            Some(Detected::Output(fragment))
        }
    }

    /// Called at end of stream; whatever is left is plain output.
    pub fn finish(&mut self) -> Option<Detected> {
        if self.pending.is_empty() {
            None
        } else {
            Some(Detected::Output(std::mem::take(&mut self.pending)))
        }
    }

    fn is_prompt_line(&self, line: &str) -> bool {
        if !self.config.line_heuristic {
            return false;
        }
        let lower = line.to_lowercase();
        lower.trim().ends_with(':') && self.markers.iter().any(|m| lower.contains(m.as_str()))
    }
}

/// Incremental UTF-8 decoding for pipe reads.
///
/// A read may end in the middle of a multi-byte character; those trailing
/// bytes wait for the next read. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.carry.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.carry) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.carry.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.carry[..valid_up_to]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.carry.drain(..valid_up_to + bad);
                        }
                        None => {
                            // Incomplete sequence at the end, keep it for later
                            self.carry.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flushes bytes left at end of stream.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PromptDetector {
        PromptDetector::new(PromptConfig::default())
    }

    #[test]
    fn test_plain_lines_are_output() {
        let mut d = detector();
        let out = d.feed("hello\nworld\n");
        assert_eq!(out, vec![Detected::Output("hello\nworld\n".into())]);
        assert!(!d.has_pending());
    }

    #[test]
    fn test_line_heuristic() {
        let mut d = detector();
        let out = d.feed("start\nPlease INPUT a number:\nmore\n");
        assert_eq!(
            out,
            vec![
                Detected::Output("start\n".into()),
                Detected::Prompt("Please INPUT a number:\n".into()),
                Detected::Output("more\n".into()),
            ]
        );
    }

    #[test]
    fn test_colon_without_marker_is_output() {
        let mut d = detector();
        let out = d.feed("Result:\n");
        assert_eq!(out, vec![Detected::Output("Result:\n".into())]);
    }

    #[test]
    fn test_custom_markers() {
        let mut d = PromptDetector::new(PromptConfig {
            markers: vec!["Enter".into()],
            ..PromptConfig::default()
        });
        let out = d.feed("Enter your age:\n");
        assert_eq!(out, vec![Detected::Prompt("Enter your age:\n".into())]);
    }

    #[test]
    fn test_fragment_becomes_prompt_when_idle() {
        let mut d = detector();
        assert!(d.feed("Name: ").is_empty());
        assert!(d.has_pending());
        assert_eq!(d.idle(), Some(Detected::Prompt("Name: ".into())));
        assert_eq!(d.idle(), None);
    }

    #[test]
    fn test_idle_prompt_disabled() {
        let mut d = PromptDetector::new(PromptConfig::disabled());
        d.feed("Loading...");
        assert_eq!(d.idle(), Some(Detected::Output("Loading...".into())));
        assert_eq!(d.feed("What is your input:\n"), vec![Detected::Output("What is your input:\n".into())]);
    }

    #[test]
    fn test_fragment_completed_before_idle() {
        let mut d = detector();
        d.feed("progress ");
        let out = d.feed("done\n");
        assert_eq!(out, vec![Detected::Output("progress done\n".into())]);
    }

    #[test]
    fn test_finish_flushes_as_output() {
        let mut d = detector();
        d.feed("no newline at end");
        assert_eq!(d.finish(), Some(Detected::Output("no newline at end".into())));
        assert_eq!(d.finish(), None);
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut dec = Utf8Decoder::new();
        let bytes = "Введите:".as_bytes();
        let first = dec.decode(&bytes[..3]);
        let second = dec.decode(&bytes[3..]);
        assert_eq!(format!("{}{}", first, second), "Введите:");
        assert_eq!(first, "В");
    }

    #[test]
    fn test_utf8_invalid_bytes_replaced() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_utf8_truncated_tail_flushed_lossy() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(&[b'x', 0xE2, 0x82]), "x");
        assert_eq!(dec.finish(), "\u{FFFD}");
    }
}
