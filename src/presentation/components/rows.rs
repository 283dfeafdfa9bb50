use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use crate::form::{FocusColumn, FormState, RowKind, RowView};

const INDENT: &str = "    ";
const HIGHLIGHT: &str = "» ";
const KEY_PLACEHOLDER: &str = "Key";

pub fn render_rows(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &mut FormState,
    enable_cursor: bool,
) {
    let selected = form_state.row_index();
    let column = form_state.column();
    adjust_scroll_offset(form_state, selected, area.height);

    let items: Vec<ListItem<'_>> = form_state
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| ListItem::new(row_line(row, index == selected, column)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    *list_state.offset_mut() = form_state.scroll_offset;

    let list = List::new(items)
        .block(Block::default().title("Fields").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(HIGHLIGHT);
    frame.render_stateful_widget(list, area, &mut list_state);

    if !enable_cursor || column != FocusColumn::Key {
        return;
    }
    let Some(row) = form_state.focused_row() else {
        return;
    };
    let Some(key) = row.key() else {
        return;
    };
    let visible_line = selected.saturating_sub(form_state.scroll_offset) as u16;
    let inner_height = area.height.saturating_sub(2);
    if visible_line >= inner_height {
        return;
    }
    let column_offset =
        HIGHLIGHT.width() + INDENT.width() * row.depth() + "[".width() + key.width();
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(column_offset as u16)
        .min(area.right().saturating_sub(2));
    let cursor_y = area.y.saturating_add(1).saturating_add(visible_line);
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// One rendered row; the focused column is highlighted on the selected row.
pub(crate) fn row_line(row: &RowView, selected: bool, column: FocusColumn) -> Line<'static> {
    let indent = Span::raw(INDENT.repeat(row.depth()));
    let RowKind::Field { key, field_type, .. } = &row.kind else {
        return Line::from(vec![
            indent,
            Span::styled("+ Add Field", Style::default().fg(Color::Green)),
        ]);
    };

    let focus = |target: FocusColumn| selected && column == target;
    let key_span = if key.is_empty() {
        Span::styled(
            format!("[{KEY_PLACEHOLDER}]"),
            column_style(focus(FocusColumn::Key)).fg(Color::DarkGray),
        )
    } else {
        Span::styled(format!("[{key}]"), column_style(focus(FocusColumn::Key)))
    };
    let mut spans = vec![
        indent,
        key_span,
        Span::raw(" "),
        Span::styled(
            format!("<{}>", field_type.label()),
            column_style(focus(FocusColumn::Type)).fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled("[x]", column_style(focus(FocusColumn::Remove)).fg(Color::Red)),
    ];
    if field_type.is_nested() {
        spans.push(Span::styled(" ▾", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn column_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn adjust_scroll_offset(form_state: &mut FormState, selected: usize, height: u16) {
    let window = height.saturating_sub(2) as usize;
    if window == 0 {
        form_state.scroll_offset = 0;
        return;
    }
    if selected < form_state.scroll_offset {
        form_state.scroll_offset = selected;
    } else if selected >= form_state.scroll_offset + window {
        form_state.scroll_offset = selected + 1 - window;
    }
}
