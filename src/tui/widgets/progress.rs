use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::DailyProgress;
use crate::tui::theme;
use crate::utils::format::{encouragement, progress_bar, progress_title};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    progress: &DailyProgress,
    selected: NaiveDate,
    today: NaiveDate,
    loading: bool,
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", progress_title(selected, today)),
            theme::purple(),
        ))
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

    let bar_width = (area.width.saturating_sub(14) as usize).clamp(4, 30);
    let bar = progress_bar(progress.completed, progress.total, bar_width);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}%", progress.percentage),
            theme::bold().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(bar, theme::purple()),
            Span::styled(
                format!("  {}/{}", progress.completed, progress.total),
                theme::bold(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", encouragement(progress.percentage)),
            theme::purple(),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
