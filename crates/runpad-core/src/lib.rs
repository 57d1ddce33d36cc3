//! # Runpad Core
//!
//! Everything behind the window that can be tested without one.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Runpad UI                          │
//! │   edits ──► Document ──save──► script on disk             │
//! │                                   │                       │
//! │                               runner::spawn               │
//! │                                   │                       │
//! │   ┌──────────── RunSession ───────┴───────────────┐       │
//! │   │ RunHandle ──input/kill──► supervisor ──► child │       │
//! │   │ events ◄── stdout/stderr readers ◄──── pipes   │       │
//! │   └────────────────────────────────────────────────┘       │
//! │                                   │                       │
//! │                              Transcript ──► output pane   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod config;
pub mod document;
pub mod runner;
pub mod transcript;

pub use config::Config;
pub use document::Document;
pub use runner::{OutputStream, RunEvent, RunExit, RunHandle, RunOptions, RunRequest, RunSession};
pub use transcript::{LineKind, Transcript, TranscriptLine};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document has no file path")]
    NoPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] runpad_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Runner error: {0}")]
    Runner(#[from] runner::RunnerError),
}
