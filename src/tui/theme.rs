use ratatui::style::{Color, Modifier, Style};

use crate::tui::popup::PopupKind;

pub const BG: Color = Color::Rgb(17, 16, 24);
pub const SURFACE: Color = Color::Rgb(27, 25, 38);
pub const BORDER: Color = Color::Rgb(58, 52, 78);
pub const TEXT: Color = Color::Rgb(226, 224, 236);
pub const TEXT_DIM: Color = Color::Rgb(128, 122, 150);
pub const PURPLE: Color = Color::Rgb(168, 85, 247);
pub const FUCHSIA: Color = Color::Rgb(217, 70, 239);
pub const AMBER: Color = Color::Rgb(245, 158, 11);
pub const GREEN: Color = Color::Rgb(34, 197, 94);
pub const RED: Color = Color::Rgb(220, 80, 70);
pub const EMPTY: Color = Color::Rgb(44, 40, 60);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn purple() -> Style {
    Style::default().fg(PURPLE)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

/// Accent colour of each popup preset.
pub fn popup_accent(kind: PopupKind) -> Color {
    match kind {
        PopupKind::Task => GREEN,
        PopupKind::Progress => FUCHSIA,
        PopupKind::Achievement => AMBER,
    }
}
