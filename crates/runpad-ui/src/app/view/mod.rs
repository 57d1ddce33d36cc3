pub mod editor;
pub mod output;
pub mod sidebar;

use iced::widget::{Space, column, container, horizontal_space, row, text};
use iced::{Background, Border, Element, Length, Padding};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let (editor_portion, output_portion) = self.config.ui.split_portions();

        let panes = column![
            container(self.view_editor()).height(Length::FillPortion(editor_portion)),
            container(self.view_output()).height(Length::FillPortion(output_portion)),
            self.view_input_line(),
        ]
        .spacing(1)
        .width(Length::Fill)
        .height(Length::Fill);

        let content = column![
            row![self.view_sidebar(), panes].height(Length::Fill),
            self.view_status_bar(),
        ];

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_DARK)),
                ..Default::default()
            })
            .into()
    }

    pub fn view_status_bar(&self) -> Element<'_, Message> {
        let (line, col) = self.content.cursor_position();
        let cursor_info = format!("Ln {}, Col {}", line + 1, col + 1);

        let run_info = match &self.run {
            Some(run) => text(run.label()).size(12).color(colors::ACCENT),
            None => text("Idle").size(12).color(colors::TEXT_MUTED),
        };

        let status_content = row![
            text(&self.status_message)
                .size(12)
                .color(colors::TEXT_SECONDARY),
            horizontal_space(),
            run_info,
            Space::with_width(24),
            text(cursor_info).size(12).color(colors::TEXT_PRIMARY),
            Space::with_width(24),
            text(&self.config.runner.interpreter)
                .size(12)
                .color(colors::TEXT_SECONDARY),
            Space::with_width(12),
        ]
        .padding(Padding::from([6, 12]))
        .align_y(iced::Alignment::Center);

        container(status_content)
            .width(Length::Fill)
            .height(28)
            .style(|_| container::Style {
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
