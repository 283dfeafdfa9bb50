use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::PopupRender;
use super::layout::popup_rect;

pub fn render_popup(frame: &mut Frame<'_>, popup: PopupRender<'_>) {
    if popup.options.is_empty() {
        return;
    }
    let widest = popup
        .options
        .iter()
        .map(|option| option.width())
        .chain(std::iter::once(popup.title.width()))
        .max()
        .unwrap_or(10) as u16;
    let width_limit = frame.area().width.saturating_sub(2).max(1);
    let width = widest.saturating_add(6).min(width_limit);
    let height = (popup.options.len() as u16)
        .saturating_add(2)
        .min(frame.area().height)
        .max(3);
    let area = popup_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let items: Vec<ListItem<'_>> = popup
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()))
        .collect();
    let mut state = ListState::default();
    state.select(Some(popup.selected.min(popup.options.len() - 1)));

    let list = List::new(items)
        .block(Block::default().title(popup.title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state);
}
