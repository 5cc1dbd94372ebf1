use std::time::Instant;

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::popup::{Phase, Popup};
use crate::tui::theme;
use crate::tui::widgets::centered_rect;
use crate::utils::format::progress_bar;

pub fn render(frame: &mut Frame, popup: &Popup, now: Instant) {
    if !popup.is_open() {
        return;
    }
    let popup_area = centered_rect(frame.area(), 52, 11);

    frame.render_widget(Clear, popup_area);

    let kind = popup.kind();
    let accent = Style::default().fg(theme::popup_accent(kind));
    // Terminals have no alpha; a faded popup is drawn dim.
    let fade = if popup.opacity(now) < 0.6 {
        Modifier::DIM
    } else {
        Modifier::empty()
    };

    let icon_style = if popup.phase() == Phase::Entering {
        accent.add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    } else {
        accent.add_modifier(Modifier::BOLD)
    };

    let bar_width = (popup_area.width as usize).saturating_sub(6);
    let elapsed = (popup.elapsed_ratio(now) * 1000.0).round() as u32;

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(kind.icon(), icon_style)),
        Line::from(Span::styled(
            kind.title(),
            theme::bold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(popup.message(), theme::bold())),
        Line::from(""),
        Line::from(Span::styled(progress_bar(elapsed, 1000, bar_width), accent)),
        Line::from(""),
        Line::from(Span::styled("✨ Keep up the great work!", theme::purple())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .style(theme::surface().add_modifier(fade));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
