use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::super::view::UiContext;

pub fn render_header(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let mut spans = vec![Span::styled(
        ctx.title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if ctx.dirty {
        spans.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
