use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

/// Key hints, or the last error when there is one.
pub fn render(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let line = match error {
        Some(err) => Line::from(Span::styled(format!("✗ {}", err), theme::red())),
        None => {
            let hints = [
                ("[a]", " add  "),
                ("[Space]", " status  "),
                ("[f]", " finish  "),
                ("[x]", " delete  "),
                ("[← →]", " day  "),
                ("[t]", " today  "),
                ("[?]", " help  "),
                ("[Esc]", " quit"),
            ];
            let mut spans = Vec::new();
            for (key, label) in &hints {
                spans.push(Span::styled(*key, theme::purple()));
                spans.push(Span::styled(*label, theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
