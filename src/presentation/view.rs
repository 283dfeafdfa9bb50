use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::form::FormState;

use super::components::{render_footer, render_header, render_popup, render_previews, render_rows};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub preview: &'a str,
    pub level_preview: Option<LevelPreview<'a>>,
    pub status_message: &'a str,
    pub dirty: bool,
    pub help: Option<&'a str>,
    pub focus_label: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
}

/// Preview of the nested level the cursor is in.
pub struct LevelPreview<'a> {
    pub label: &'a str,
    pub text: &'a str,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

pub fn draw(frame: &mut Frame<'_>, form_state: &mut FormState, ctx: UiContext<'_>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(4),
    ])
    .areas(frame.area());
    let [editor_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);

    render_header(frame, header, &ctx);
    render_rows(frame, editor_area, form_state, ctx.popup.is_none());
    render_previews(frame, preview_area, &ctx);
    render_footer(frame, footer, &ctx);

    if let Some(popup) = ctx.popup {
        render_popup(frame, popup);
    }
}
