use std::path::PathBuf;

use runpad_core::{Config, RunEvent, RunHandle};

/// Launch options handed over by the binary.
#[derive(Debug, Default)]
pub struct Flags {
    /// Script to open at startup
    pub file: Option<PathBuf>,
    /// Effective configuration, CLI overrides already applied
    pub config: Config,
}

/// What a run stream reports back to `update`.
#[derive(Debug, Clone)]
pub enum RunUpdate {
    /// The child started; the handle steers it
    Attached(RunHandle),
    Event(RunEvent),
    /// The child could not be started
    Failed(String),
}

/// Bookkeeping for the script currently running.
#[derive(Debug)]
pub struct ActiveRun {
    /// Matches the generation tag on this run's messages
    pub generation: u64,
    /// None until the stream has spawned the child
    pub handle: Option<RunHandle>,
    pub script_name: String,
    /// The script printed a prompt and has not been answered
    pub awaiting_input: bool,
    /// Stop was pressed before the child was attached
    pub stop_requested: bool,
}

impl ActiveRun {
    pub fn new(generation: u64, script_name: String) -> Self {
        Self {
            generation,
            handle: None,
            script_name,
            awaiting_input: false,
            stop_requested: false,
        }
    }

    /// Kills the child, or remembers to once it is attached.
    pub fn stop(&mut self) {
        match &self.handle {
            Some(handle) => handle.kill(),
            None => self.stop_requested = true,
        }
    }

    /// Short label for the status bar.
    pub fn label(&self) -> String {
        let pid = self
            .handle
            .as_ref()
            .and_then(|h| h.pid())
            .map(|pid| format!(" (pid {})", pid))
            .unwrap_or_default();

        if self.awaiting_input {
            format!("{}{}: waiting for input", self.script_name, pid)
        } else if self.stop_requested {
            format!("{}: stopping", self.script_name)
        } else {
            format!("{}{}: running", self.script_name, pid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_before_attach_is_remembered() {
        let mut run = ActiveRun::new(1, "hello.py".to_string());
        assert_eq!(run.label(), "hello.py: running");
        run.stop();
        assert!(run.stop_requested);
        assert_eq!(run.label(), "hello.py: stopping");
    }

    #[test]
    fn test_waiting_label() {
        let mut run = ActiveRun::new(3, "quiz.py".to_string());
        run.awaiting_input = true;
        assert_eq!(run.label(), "quiz.py: waiting for input");
    }
}
