use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, selected: NaiveDate, today: NaiveDate, user_id: &str) {
    let title_line = Line::from(vec![
        Span::styled("  ◕‿◕  ", theme::purple().add_modifier(Modifier::BOLD)),
        Span::styled("dado", theme::purple()),
    ]);

    let day_hint = if selected == today {
        Span::styled("  ·  today", theme::green())
    } else {
        Span::styled(
            format!("  ·  {:+} days", (selected - today).num_days()),
            theme::amber(),
        )
    };

    let date_line = Line::from(vec![
        Span::styled(selected.format("%A, %b %d, %Y").to_string(), theme::bold()),
        day_hint,
        Span::styled(format!("  ·  {}", user_id), theme::dim()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::purple().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
