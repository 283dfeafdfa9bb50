use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let [actions_area, status_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(2)]).areas(area);

    let actions = ctx.help.unwrap_or(" ");
    let actions_widget = Paragraph::new(format!("Actions: {actions}"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(actions_widget, actions_area);

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if let Some(label) = ctx.focus_label {
        status.push_str(" • focus: ");
        status.push_str(label);
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let status_widget = Paragraph::new(Line::from(vec![Span::raw("Status: "), Span::raw(status)]))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_widget, status_area);
}
