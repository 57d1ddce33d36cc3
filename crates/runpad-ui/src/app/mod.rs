use iced::widget::{scrollable, text_editor, text_input};
use iced::{Subscription, Task, keyboard};
use runpad_core::{Config, Document, Transcript};

pub mod file_ops;
pub mod messages;
pub mod session;
pub mod types;
pub mod update;
pub mod view;

pub use messages::*;
pub use types::*;

pub struct App {
    pub config: Config,
    pub document: Document,
    /// Widget state for the editor pane; the document mirrors its text
    pub content: text_editor::Content,
    pub transcript: Transcript,
    pub input_value: String,
    pub run: Option<ActiveRun>,
    /// Bumped for every run so late messages from older runs are ignored
    pub generation: u64,
    pub status_message: String,
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags { file, config } = flags;

        let app = Self {
            transcript: Transcript::new(config.output.max_lines),
            config,
            document: Document::new(),
            content: text_editor::Content::new(),
            input_value: String::new(),
            run: None,
            generation: 0,
            status_message: "Ready | Ctrl+O: Open | Ctrl+S: Save | F5: Run".to_string(),
        };

        let task = match file {
            Some(path) => Task::perform(file_ops::load(path), Message::FileOpened),
            None => Task::none(),
        };

        (app, task)
    }

    pub fn title(&self) -> String {
        self.document.title()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, modifiers| Some(Message::KeyPressed(key, modifiers)))
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn awaiting_input(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.awaiting_input)
    }
}

pub fn output_scroll_id() -> scrollable::Id {
    scrollable::Id::new("runpad-output")
}

pub fn input_id() -> text_input::Id {
    text_input::Id::new("runpad-input")
}

pub fn run(flags: Flags) -> iced::Result {
    let ui = flags.config.ui.clone();
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(iced::Size::new(ui.window_width, ui.window_height))
        .theme(|_| iced::Theme::Dark)
        .antialiasing(true)
        .run_with(move || App::new(flags))
}
