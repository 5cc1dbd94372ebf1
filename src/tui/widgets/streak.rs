use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Streak;
use crate::tui::theme;
use crate::utils::format::day_count;

pub fn render(frame: &mut Frame, area: Rect, streak: &Streak, loading: bool) {
    let block = Block::default()
        .title(Span::styled(" Current Streak ", theme::amber()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    if loading {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  loading…", theme::dim())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🔥 ", theme::amber()),
            Span::styled(
                day_count(streak.current),
                theme::bold().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Longest Streak:  ", theme::amber()),
            Span::styled(format!("{} days", streak.longest), theme::bold()),
        ]),
        Line::from(vec![
            Span::styled("  This Month:      ", theme::amber()),
            Span::styled(format!("{} days", streak.this_month), theme::bold()),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
