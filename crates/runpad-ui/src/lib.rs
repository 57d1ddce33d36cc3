//! # Runpad UI
//!
//! The window: a button column, the script editor, the output pane with its
//! input line, and a status bar.
//!
//! ## Architecture
//!
//! The UI follows the Elm architecture (TEA):
//! - **Model**: [`App`] holds the document, the transcript and the active run
//! - **Message**: everything that can happen, including runner events
//! - **Update**: `(state, message) -> Task`
//! - **View**: `state -> Element`
//!
//! ## Learning: Streams as Tasks
//!
//! A running script is just another source of messages. The runner's event
//! channel is wrapped in a stream and handed to `Task::run`, so child output
//! flows through `update` like a button press would.

pub mod app;
pub mod theme;

pub use app::{App, Flags, run};
