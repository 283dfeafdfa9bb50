use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::super::view::UiContext;

/// Root preview, plus the focused nested level's own preview below it.
pub fn render_previews(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let Some(level) = &ctx.level_preview else {
        render_preview(frame, area, "Live JSON Preview", ctx.preview);
        return;
    };
    let [root_area, level_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    render_preview(frame, root_area, "Live JSON Preview", ctx.preview);
    render_preview(
        frame,
        level_area,
        &format!("{} preview", level.label),
        level.text,
    );
}

fn render_preview(frame: &mut Frame<'_>, area: Rect, title: &str, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL),
        );
    frame.render_widget(widget, area);
}
