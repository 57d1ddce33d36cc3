use iced::widget::{Space, button, column, container, text};
use iced::{Background, Border, Element, Length, Padding, Theme};

use crate::app::{App, Message};
use crate::theme::{self, colors};

impl App {
    /// The button column on the left.
    pub fn view_sidebar(&self) -> Element<'_, Message> {
        let running = self.is_running();
        let has_output = !self.transcript.is_empty();

        let action = |label: &'static str, message: Option<Message>| {
            button(text(label).size(13))
                .width(Length::Fill)
                .padding(Padding::from([6, 10]))
                .style(theme::panel_button)
                .on_press_maybe(message)
        };

        let buttons = column![
            action("Open", Some(Message::OpenFile)),
            action("Save", Some(Message::Save)),
            action("Save As", Some(Message::SaveAs)),
            Space::with_height(12),
            button(text("Run").size(13))
                .width(Length::Fill)
                .padding(Padding::from([6, 10]))
                .style(theme::run_button)
                .on_press(Message::Run),
            action("Stop", running.then_some(Message::Stop)),
            Space::with_height(12),
            action("Clear output", has_output.then_some(Message::ClearOutput)),
            action("Copy output", has_output.then_some(Message::CopyOutput)),
        ]
        .spacing(4);

        container(buttons)
            .width(120)
            .height(Length::Fill)
            .padding(Padding::from([10, 8]))
            .style(|_: &Theme| container::Style {
                background: Some(Background::Color(colors::BG_MEDIUM)),
                border: Border {
                    color: colors::BORDER,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }
}
