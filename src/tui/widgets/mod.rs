use ratatui::layout::Rect;

pub mod header;
pub mod popup;
pub mod progress;
pub mod statusbar;
pub mod streak;
pub mod tasks;

/// A `width` x `height` rect centred in `area`, shrunk to fit inside it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
