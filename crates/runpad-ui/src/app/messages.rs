use iced::keyboard;
use iced::widget::text_editor;
use std::path::PathBuf;

use crate::app::types::RunUpdate;

#[derive(Debug, Clone)]
pub enum Message {
    // File operations
    OpenFile,
    Save,
    SaveAs,

    // Edit operations
    Undo,
    Redo,

    // Editor
    EditorAction(text_editor::Action),

    // Running
    Run,
    Stop,
    ClearOutput,
    CopyOutput,

    // Input line
    InputChanged(String),
    InputSubmitted,

    KeyPressed(keyboard::Key, keyboard::Modifiers),

    // Async results
    FileOpened(Result<(PathBuf, String), String>),
    FileSaved {
        result: Result<PathBuf, String>,
        /// Buffer revision the written text came from
        revision: u64,
        /// Start a run once the save succeeded
        then_run: bool,
    },
    /// Runner output tagged with the generation of the run it belongs to
    Runner(u64, RunUpdate),
}
