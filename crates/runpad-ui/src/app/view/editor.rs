use iced::widget::text_editor;
use iced::{Background, Border, Color, Element, Font, Length, Theme};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view_editor(&self) -> Element<'_, Message> {
        // text_editor scrolls on its own; wrapping it in scrollable() resets
        // the position on every re-render.
        text_editor(&self.content)
            .placeholder("Write a script, then press F5 to run it")
            .height(Length::Fill)
            .padding(iced::Padding {
                top: 12.0,
                right: 16.0,
                bottom: 12.0,
                left: 12.0,
            })
            .font(Font::MONOSPACE)
            .size(self.config.ui.font_size)
            .style(|_theme: &Theme, _status| text_editor::Style {
                background: Background::Color(colors::BG_DARK),
                border: Border {
                    width: 0.0,
                    radius: 0.0.into(),
                    color: Color::TRANSPARENT,
                },
                icon: colors::TEXT_MUTED,
                placeholder: colors::TEXT_MUTED,
                value: colors::TEXT_PRIMARY,
                selection: colors::SELECTION,
            })
            .on_action(Message::EditorAction)
            .into()
    }
}
