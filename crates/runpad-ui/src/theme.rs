//! Fixed dark palette and the few shared widget styles.

use iced::widget::button;
use iced::{Background, Border, Color, Theme};
use runpad_core::LineKind;

pub mod colors {
    use iced::Color;

    pub const BG_DARK: Color = Color::from_rgb(0.11, 0.11, 0.13);
    pub const BG_MEDIUM: Color = Color::from_rgb(0.14, 0.14, 0.16);
    pub const BG_LIGHT: Color = Color::from_rgb(0.18, 0.18, 0.20);
    pub const BG_HOVER: Color = Color::from_rgb(0.22, 0.22, 0.25);
    pub const BG_ACTIVE: Color = Color::from_rgb(0.25, 0.25, 0.28);
    pub const BG_OUTPUT: Color = Color::from_rgb(0.09, 0.09, 0.10);

    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.93, 0.93, 0.93);
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.65, 0.65, 0.68);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.45, 0.45, 0.48);

    pub const ACCENT: Color = Color::from_rgb(0.36, 0.54, 0.90);
    pub const SELECTION: Color = Color::from_rgba(0.25, 0.46, 0.85, 0.55);

    pub const STDERR: Color = Color::from_rgb(0.90, 0.35, 0.35);
    pub const PROMPT: Color = Color::from_rgb(0.90, 0.75, 0.30);
    pub const INPUT: Color = Color::from_rgb(0.55, 0.80, 0.55);

    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
}

/// Text color for a line of the output pane.
pub fn line_color(kind: LineKind) -> Color {
    match kind {
        LineKind::Banner => colors::TEXT_MUTED,
        LineKind::Stdout => colors::TEXT_PRIMARY,
        LineKind::Stderr | LineKind::Error => colors::STDERR,
        LineKind::Prompt => colors::PROMPT,
        LineKind::Input => colors::INPUT,
    }
}

/// Style for the buttons in the left column.
pub fn panel_button(_theme: &Theme, status: button::Status) -> button::Style {
    let (bg, text_color) = match status {
        button::Status::Hovered => (colors::BG_HOVER, colors::TEXT_PRIMARY),
        button::Status::Pressed => (colors::BG_ACTIVE, colors::TEXT_PRIMARY),
        button::Status::Disabled => (colors::BG_MEDIUM, colors::TEXT_MUTED),
        button::Status::Active => (colors::BG_LIGHT, colors::TEXT_SECONDARY),
    };
    button::Style {
        background: Some(Background::Color(bg)),
        text_color,
        border: Border {
            radius: 3.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// The Run button stands out from the rest.
pub fn run_button(theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active | button::Status::Hovered => button::Style {
            background: Some(Background::Color(colors::ACCENT)),
            text_color: colors::TEXT_PRIMARY,
            ..panel_button(theme, status)
        },
        _ => panel_button(theme, status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_share_the_stderr_color() {
        assert_eq!(line_color(LineKind::Stderr), line_color(LineKind::Error));
        assert_ne!(line_color(LineKind::Stdout), line_color(LineKind::Prompt));
    }
}
