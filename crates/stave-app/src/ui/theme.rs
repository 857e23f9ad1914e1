//! Shared styles for stave views

use iced::widget::container;
use iced::{Border, Color, Theme};

/// Accent color for active elements (play button, active step, active note)
pub const ACCENT: Color = Color::from_rgb(0.55, 0.40, 0.95);

/// Green used for completed steps
pub const DONE: Color = Color::from_rgb(0.2, 0.7, 0.3);

/// Dimmed text for past notes and pending steps
pub const DIMMED: Color = Color::from_rgb(0.5, 0.5, 0.55);

/// Card container used by every section (input, progress, sheet, listener)
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(iced::Background::Color(palette.background.weak.color)),
        border: Border {
            radius: 8.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Highlighted row for notes currently sounding
pub fn note_row_active(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(Color {
            a: 0.35,
            ..ACCENT
        })),
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Banner container for user-visible errors
pub fn error_banner(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(Color::from_rgb(0.45, 0.15, 0.15))),
        text_color: Some(Color::WHITE),
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
