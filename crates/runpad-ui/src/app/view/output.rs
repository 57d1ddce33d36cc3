use iced::widget::{Column, container, row, scrollable, text, text_input};
use iced::{Background, Border, Color, Element, Font, Length, Padding, Theme};

use crate::app::{App, Message, input_id, output_scroll_id};
use crate::theme::{self, colors};

impl App {
    /// Read-only transcript of the current run.
    pub fn view_output(&self) -> Element<'_, Message> {
        let size = self.config.ui.font_size - 1.0;
        let mut lines: Vec<Element<'_, Message>> = Vec::with_capacity(self.transcript.len() + 1);

        if self.transcript.dropped() > 0 {
            lines.push(
                text(format!("... {} earlier lines dropped", self.transcript.dropped()))
                    .size(size)
                    .font(Font::MONOSPACE)
                    .color(colors::TEXT_MUTED)
                    .into(),
            );
        }

        for line in self.transcript.lines() {
            // An empty text collapses to zero height
            let content = if line.text.is_empty() { " " } else { line.text.as_str() };
            lines.push(
                text(content)
                    .size(size)
                    .font(Font::MONOSPACE)
                    .color(theme::line_color(line.kind))
                    .into(),
            );
        }

        let body = scrollable(
            container(Column::with_children(lines).spacing(1))
                .padding(Padding::from([8, 12]))
                .width(Length::Fill),
        )
        .id(output_scroll_id())
        .height(Length::Fill);

        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_OUTPUT)),
                border: Border {
                    color: colors::BORDER,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    /// The line used to answer a script's prompts.
    pub fn view_input_line(&self) -> Element<'_, Message> {
        let awaiting = self.awaiting_input();
        let placeholder = if self.is_running() {
            "Type input for the script and press Enter"
        } else {
            "Input is available while a script runs"
        };

        let mut input = text_input(placeholder, &self.input_value)
            .id(input_id())
            .font(Font::MONOSPACE)
            .size(self.config.ui.font_size - 1.0)
            .padding(Padding::from([6, 10]))
            .style(move |_: &Theme, status| {
                let border_color = match (awaiting, status) {
                    (true, _) => colors::ACCENT,
                    (false, text_input::Status::Focused) => colors::BORDER,
                    _ => Color::TRANSPARENT,
                };
                text_input::Style {
                    background: Background::Color(colors::BG_LIGHT),
                    border: Border {
                        color: border_color,
                        width: 1.0,
                        radius: 3.0.into(),
                    },
                    icon: colors::TEXT_MUTED,
                    placeholder: colors::TEXT_MUTED,
                    value: colors::TEXT_PRIMARY,
                    selection: colors::SELECTION,
                }
            });

        if self.is_running() {
            input = input
                .on_input(Message::InputChanged)
                .on_submit(Message::InputSubmitted);
        }

        let prompt_color = if awaiting { colors::PROMPT } else { colors::TEXT_MUTED };

        container(
            row![text(">").font(Font::MONOSPACE).color(prompt_color), input]
                .spacing(8)
                .align_y(iced::Alignment::Center),
        )
        .padding(Padding::from([4, 8]))
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            ..Default::default()
        })
        .into()
    }
}
