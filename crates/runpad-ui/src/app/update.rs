use iced::widget::{scrollable, text_editor, text_input};
use iced::{Task, keyboard};
use runpad_core::{LineKind, OutputStream, RunEvent, RunOptions, RunRequest};

use super::file_ops::CANCELLED;
use super::session::run_stream;
use super::{ActiveRun, App, Message, RunUpdate, input_id, output_scroll_id};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFile => return self.open_task(),

            Message::Save => return self.save_task(false),

            Message::SaveAs => return self.save_as_task(false),

            Message::Undo => match self.document.undo() {
                Ok(()) => {
                    self.reload_content();
                    self.status_message = "Undo".to_string();
                }
                Err(_) => self.status_message = "Nothing to undo".to_string(),
            },

            Message::Redo => match self.document.redo() {
                Ok(()) => {
                    self.reload_content();
                    self.status_message = "Redo".to_string();
                }
                Err(_) => self.status_message = "Nothing to redo".to_string(),
            },

            Message::EditorAction(action) => {
                let is_edit = action.is_edit();
                self.content.perform(action);
                if is_edit {
                    self.document.sync_text(&self.content.text());
                }
            }

            Message::Run => return self.request_run(),

            Message::Stop => match self.run.as_mut() {
                Some(run) => {
                    run.stop();
                    self.status_message = format!("Stopping {}", run.script_name);
                }
                None => self.status_message = "Nothing is running".to_string(),
            },

            Message::ClearOutput => {
                self.transcript.clear();
            }

            Message::CopyOutput => {
                let text = self.transcript.to_plain_text();
                if text.is_empty() {
                    self.status_message = "Output is empty".to_string();
                } else {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
                        Ok(()) => self.status_message = "Output copied".to_string(),
                        Err(e) => {
                            tracing::warn!("Clipboard unavailable: {}", e);
                            self.status_message = format!("Copy failed: {}", e);
                        }
                    }
                }
            }

            Message::InputChanged(value) => {
                self.input_value = value;
            }

            Message::InputSubmitted => return self.submit_input(),

            Message::KeyPressed(key, modifiers) => {
                if let Some(message) = shortcut(&key, modifiers) {
                    return self.update(message);
                }
            }

            Message::FileOpened(result) => match result {
                Ok((path, text)) => {
                    self.document = runpad_core::Document::opened(&path, &text);
                    self.content = text_editor::Content::with_text(&text);
                    self.status_message = format!("Opened: {}", path.display());
                    tracing::info!("Opened {}", path.display());
                }
                Err(e) if e == CANCELLED => {}
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.status_message = e;
                }
            },

            Message::FileSaved {
                result,
                revision,
                then_run,
            } => match result {
                Ok(path) => {
                    self.document.mark_saved(&path, revision);
                    self.status_message = format!("Saved: {}", path.display());
                    if then_run {
                        return self.start_run();
                    }
                }
                Err(e) if e == CANCELLED => {
                    self.status_message = if then_run {
                        "Run cancelled".to_string()
                    } else {
                        "Save cancelled".to_string()
                    };
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    if then_run {
                        self.transcript.push_line(LineKind::Error, &e);
                    }
                    self.status_message = e;
                }
            },

            Message::Runner(generation, update) => return self.handle_run_update(generation, update),
        }
        Task::none()
    }

    /// Run button: save first when needed, then start.
    fn request_run(&mut self) -> Task<Message> {
        let must_save = if self.config.runner.save_before_run {
            self.document.needs_save()
        } else {
            self.document.path().is_none()
        };

        if must_save {
            self.status_message = "Saving before run".to_string();
            self.save_task(true)
        } else {
            self.start_run()
        }
    }

    fn start_run(&mut self) -> Task<Message> {
        let Some(path) = self.document.path().map(|p| p.to_path_buf()) else {
            self.status_message = "Save the script before running it".to_string();
            return Task::none();
        };

        if let Some(mut previous) = self.run.take() {
            tracing::info!("Replacing run of {}", previous.script_name);
            previous.stop();
        }

        self.generation += 1;
        let generation = self.generation;
        let script_name = self.document.name().to_string();

        self.transcript.clear();
        self.input_value.clear();
        if self.config.output.show_banners {
            self.transcript.banner(&format!("Running {}", script_name));
        }

        let request = RunRequest::for_script(&self.config.runner, path);
        tracing::debug!("Run #{}: {}", generation, request.command_line());
        let options = RunOptions::from_config(&self.config);

        self.status_message = format!("Running {}", script_name);
        self.run = Some(ActiveRun::new(generation, script_name));

        Task::run(run_stream(request, options), move |update| {
            Message::Runner(generation, update)
        })
    }

    fn handle_run_update(&mut self, generation: u64, update: RunUpdate) -> Task<Message> {
        let Some(run) = self.run.as_mut().filter(|run| run.generation == generation) else {
            if let RunUpdate::Attached(handle) = update {
                // A superseded run finished spawning after it was replaced
                handle.kill();
            }
            return Task::none();
        };

        match update {
            RunUpdate::Attached(handle) => {
                if run.stop_requested {
                    handle.kill();
                }
                run.handle = Some(handle);
                self.status_message = run.label();
                Task::none()
            }

            RunUpdate::Event(RunEvent::Started { pid }) => {
                tracing::debug!(pid = ?pid, "Run #{} started", generation);
                Task::none()
            }

            RunUpdate::Event(RunEvent::Output { stream, text }) => {
                let kind = match stream {
                    OutputStream::Stdout => LineKind::Stdout,
                    OutputStream::Stderr => LineKind::Stderr,
                };
                self.transcript.push(kind, &text);
                if stream == OutputStream::Stdout {
                    run.awaiting_input = false;
                }
                scroll_to_end()
            }

            RunUpdate::Event(RunEvent::InputRequested { prompt }) => {
                self.transcript.push(LineKind::Prompt, &prompt);
                run.awaiting_input = true;
                self.status_message = run.label();
                Task::batch([scroll_to_end(), text_input::focus(input_id())])
            }

            RunUpdate::Event(RunEvent::Exited(exit)) => {
                if self.config.output.show_banners {
                    self.transcript.banner(&format!("Finished ({})", exit));
                }
                self.status_message = format!("{} finished ({})", run.script_name, exit);
                self.run = None;
                scroll_to_end()
            }

            RunUpdate::Failed(e) => {
                self.transcript.push_line(LineKind::Error, &e);
                self.status_message = e;
                self.run = None;
                scroll_to_end()
            }
        }
    }

    fn submit_input(&mut self) -> Task<Message> {
        let Some(handle) = self.run.as_ref().and_then(|run| run.handle.clone()) else {
            self.status_message = "No script is waiting for input".to_string();
            return Task::none();
        };

        let line = std::mem::take(&mut self.input_value);
        match handle.send_input(&line) {
            Ok(()) => {
                self.transcript.push_line(LineKind::Input, &line);
                if let Some(run) = self.run.as_mut() {
                    run.awaiting_input = false;
                    self.status_message = run.label();
                }
            }
            Err(e) => {
                self.transcript.push_line(LineKind::Error, &e.to_string());
                self.status_message = e.to_string();
            }
        }
        scroll_to_end()
    }

    /// Rebuilds the editor widget after the document changed underneath it.
    fn reload_content(&mut self) {
        self.content = text_editor::Content::with_text(&self.document.text());
    }
}

fn scroll_to_end() -> Task<Message> {
    scrollable::snap_to(output_scroll_id(), scrollable::RelativeOffset::END)
}

/// Fixed key bindings.
pub fn shortcut(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> Option<Message> {
    use keyboard::key::Named;

    match key {
        keyboard::Key::Named(Named::F5) if modifiers.shift() => Some(Message::Stop),
        keyboard::Key::Named(Named::F5) => Some(Message::Run),
        keyboard::Key::Character(c) if modifiers.control() => {
            match (c.to_lowercase().as_str(), modifiers.shift()) {
                ("o", false) => Some(Message::OpenFile),
                ("s", false) => Some(Message::Save),
                ("s", true) => Some(Message::SaveAs),
                ("z", false) => Some(Message::Undo),
                ("y", false) | ("z", true) => Some(Message::Redo),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyboard::{Key, Modifiers, key::Named};

    fn char_key(c: &str) -> Key {
        Key::Character(c.into())
    }

    #[test]
    fn test_file_shortcuts() {
        assert!(matches!(shortcut(&char_key("o"), Modifiers::CTRL), Some(Message::OpenFile)));
        assert!(matches!(shortcut(&char_key("s"), Modifiers::CTRL), Some(Message::Save)));
        assert!(matches!(
            shortcut(&char_key("S"), Modifiers::CTRL | Modifiers::SHIFT),
            Some(Message::SaveAs)
        ));
    }

    #[test]
    fn test_run_shortcuts() {
        assert!(matches!(shortcut(&Key::Named(Named::F5), Modifiers::empty()), Some(Message::Run)));
        assert!(matches!(shortcut(&Key::Named(Named::F5), Modifiers::SHIFT), Some(Message::Stop)));
    }

    #[test]
    fn test_history_shortcuts() {
        assert!(matches!(shortcut(&char_key("z"), Modifiers::CTRL), Some(Message::Undo)));
        assert!(matches!(shortcut(&char_key("y"), Modifiers::CTRL), Some(Message::Redo)));
    }

    #[test]
    fn test_plain_typing_is_not_a_shortcut() {
        assert!(shortcut(&char_key("s"), Modifiers::empty()).is_none());
        assert!(shortcut(&char_key("q"), Modifiers::CTRL).is_none());
    }
}
