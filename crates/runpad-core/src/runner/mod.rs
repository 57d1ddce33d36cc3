//! Running a script as a child process and talking to it.
//!
//! ## Architecture
//!
//! ```text
//!  RunHandle ──Control──► supervisor ──► stdin writer ──► child stdin
//!                             │
//!                        child.wait()
//!                             │
//!  events ◄── stdout reader ◄─┴─► stderr reader
//! ```
//!
//! Readers classify output with a [`PromptDetector`] and push [`RunEvent`]s
//! into a bounded channel. When the consumer falls behind, the readers wait,
//! the pipe fills up and the child blocks on its next write instead of the
//! editor buffering without limit.
//!
//! ## Learning: Ownership of the Child
//!
//! Only the supervisor task owns the `Child`. Everybody else talks to it
//! through a channel, so there is no lock around the process and killing
//! it cannot race with waiting on it.

mod prompt;
mod supervisor;

pub use prompt::{Detected, PromptDetector, Utf8Decoder};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::{Config, PromptConfig, RunnerConfig, WorkingDir};
use supervisor::Control;

/// Which pipe a chunk of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Something that happened to a running script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Always the first event of a session
    Started { pid: Option<u32> },
    /// A chunk of output, usually one or more complete lines
    Output { stream: OutputStream, text: String },
    /// The script looks like it is waiting for a line on stdin
    InputRequested { prompt: String },
    /// Always the last event; all output has been delivered before it
    Exited(RunExit),
}

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunExit {
    pub code: Option<i32>,
    pub signal: Option<i32>,
    pub success: bool,
    /// The editor asked for the kill
    pub killed: bool,
}

impl RunExit {
    fn from_status(status: std::process::ExitStatus, killed: bool) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
            success: status.success(),
            killed,
        }
    }
}

impl std::fmt::Display for RunExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.killed, self.code, self.signal) {
            (true, _, _) => write!(f, "killed"),
            (false, Some(code), _) => write!(f, "exit code {}", code),
            (false, None, Some(signal)) => write!(f, "terminated by signal {}", signal),
            (false, None, None) => write!(f, "terminated"),
        }
    }
}

/// What to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub program: String,
    pub args: Vec<String>,
    pub script: PathBuf,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl RunRequest {
    /// Builds the request for running `script` with the configured interpreter.
    ///
    /// A relative `script` is resolved against the current directory first,
    /// since the child may start somewhere else.
    pub fn for_script(config: &RunnerConfig, script: impl Into<PathBuf>) -> Self {
        let script = script.into();
        let script = std::path::absolute(&script).unwrap_or(script);
        let working_dir = match config.working_dir {
            WorkingDir::Script => script
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf),
            WorkingDir::Inherit => None,
        };

        Self {
            program: config.interpreter.clone(),
            args: config.args.clone(),
            script,
            working_dir,
            env: config
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Human-readable command line for logs and banners.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push(self.script.display().to_string());
        parts.join(" ")
    }
}

/// Tuning knobs for a session.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub prompt: PromptConfig,
    pub capacity: usize,
    pub drain_timeout: Duration,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prompt: config.prompt.clone(),
            capacity: config.runner.event_capacity,
            drain_timeout: config.runner.drain_timeout(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Controls a running script. Cheap to clone.
///
/// When the last handle is dropped the child is killed.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pid: Option<u32>,
    control: mpsc::UnboundedSender<Control>,
    alive: Arc<AtomicBool>,
}

impl RunHandle {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// True until the child has exited.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire) && !self.control.is_closed()
    }

    /// Sends one line to the script's stdin. A newline is appended.
    pub fn send_input(&self, text: &str) -> Result<(), RunnerError> {
        self.send(Control::Input(text.to_string()))
    }

    /// Closes the script's stdin so reads see end of file.
    pub fn close_input(&self) -> Result<(), RunnerError> {
        self.send(Control::CloseInput)
    }

    /// Kills the child. Calling it on a finished run does nothing.
    pub fn kill(&self) {
        let _ = self.control.send(Control::Kill);
    }

    fn send(&self, control: Control) -> Result<(), RunnerError> {
        if !self.is_alive() {
            return Err(RunnerError::NotRunning);
        }
        self.control
            .send(control)
            .map_err(|_| RunnerError::NotRunning)
    }
}

/// A started run: the handle to steer it and the events it produces.
#[derive(Debug)]
pub struct RunSession {
    pub handle: RunHandle,
    pub events: mpsc::Receiver<RunEvent>,
}

/// Runner errors.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Script not found: {0}")]
    ScriptNotFound(PathBuf),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Child process has no {0} pipe")]
    MissingPipe(&'static str),

    #[error("Script is not running")]
    NotRunning,
}

/// Launches a script and starts supervising it.
///
/// Must be called from within a tokio runtime.
pub fn spawn(request: RunRequest, options: RunOptions) -> Result<RunSession, RunnerError> {
    if !request.script.is_file() {
        return Err(RunnerError::ScriptNotFound(request.script));
    }

    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .arg(&request.script)
        .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &request.working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: request.program.clone(),
        source,
    })?;

    let pid = child.id();
    let stdin = child.stdin.take().ok_or(RunnerError::MissingPipe("stdin"))?;
    let stdout = child.stdout.take().ok_or(RunnerError::MissingPipe("stdout"))?;
    let stderr = child.stderr.take().ok_or(RunnerError::MissingPipe("stderr"))?;

    tracing::info!(pid = ?pid, "Started {}", request.command_line());

    let (events_tx, events_rx) = mpsc::channel(options.capacity.max(1));
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let alive = Arc::new(AtomicBool::new(true));

    // Fresh channel with room for at least one event
    let _ = events_tx.try_send(RunEvent::Started { pid });

    tokio::spawn(supervisor::supervise(
        supervisor::Pipes {
            child,
            stdin,
            stdout,
            stderr,
        },
        control_rx,
        events_tx,
        options,
        alive.clone(),
    ));

    Ok(RunSession {
        handle: RunHandle {
            pid,
            control: control_tx,
            alive,
        },
        events: events_rx,
    })
}
