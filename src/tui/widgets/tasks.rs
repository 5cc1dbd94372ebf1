use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Task, TaskStatus};
use crate::tui::theme;
use crate::utils::format::truncate_to_width;

pub fn render(frame: &mut Frame, area: Rect, tasks: &[Task], focus_idx: usize) {
    let block = Block::default()
        .title(Span::styled(format!(" Tasks ({}) ", tasks.len()), theme::purple()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::purple())
        .style(theme::surface());

    if tasks.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No tasks yet. Press [a] to add one.", theme::dim())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let title_width = (area.width as usize).saturating_sub(22);
    let mut lines = vec![Line::from("")];

    for (i, task) in tasks.iter().enumerate() {
        let (icon, style) = match &task.status {
            TaskStatus::Finished => ("✓", theme::green()),
            TaskStatus::InProgress => ("◑", theme::amber()),
            TaskStatus::NotStarted => ("○", theme::dim()),
            TaskStatus::Other(_) => ("?", theme::dim()),
        };

        let focused = i == focus_idx;
        let cursor = if focused { "▸ " } else { "  " };
        let title_style = if focused {
            theme::bold().add_modifier(Modifier::BOLD)
        } else if task.is_finished() {
            theme::dim().add_modifier(Modifier::CROSSED_OUT)
        } else {
            theme::bold()
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, theme::purple()),
            Span::styled(format!("{} ", icon), style),
            Span::styled(truncate_to_width(&task.title, title_width), title_style),
            Span::styled(format!("  {}", task.status), style),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
