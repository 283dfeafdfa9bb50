use crossterm::event::KeyEvent;

use crate::domain::{FieldTree, FieldType};

use super::{
    editor::{EditorCommand, SchemaEditor},
    rows::{RowView, collect_rows},
    text::handle_text_edit,
};

/// Column of a field row that receives input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusColumn {
    #[default]
    Key,
    Type,
    Remove,
}

impl FocusColumn {
    const ORDER: [FocusColumn; 3] = [FocusColumn::Key, FocusColumn::Type, FocusColumn::Remove];

    fn step(self, delta: i32) -> Self {
        let position = Self::ORDER
            .iter()
            .position(|column| *column == self)
            .unwrap_or(0) as i32;
        let next = (position + delta).rem_euclid(Self::ORDER.len() as i32);
        Self::ORDER[next as usize]
    }
}

/// Editor plus the cursor over its flattened rows.
#[derive(Debug)]
pub struct FormState {
    editor: SchemaEditor,
    rows: Vec<RowView>,
    row_index: usize,
    column: FocusColumn,
    dirty: bool,
    pub scroll_offset: usize,
}

impl FormState {
    pub fn new(editor: SchemaEditor) -> Self {
        let rows = collect_rows(&editor);
        Self {
            editor,
            rows,
            row_index: 0,
            column: FocusColumn::Key,
            dirty: false,
            scroll_offset: 0,
        }
    }

    pub fn editor(&self) -> &SchemaEditor {
        &self.editor
    }

    pub fn fields(&self) -> &FieldTree {
        self.editor.fields()
    }

    pub fn rows(&self) -> &[RowView] {
        &self.rows
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn column(&self) -> FocusColumn {
        self.column
    }

    pub fn focused_row(&self) -> Option<&RowView> {
        self.rows.get(self.row_index)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn focus_row(&mut self, delta: i32) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as i32;
        self.row_index = (self.row_index as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn focus_column(&mut self, delta: i32) {
        if self.focused_row().is_some_and(RowView::is_add) {
            return;
        }
        self.column = self.column.step(delta);
    }

    pub fn set_column(&mut self, column: FocusColumn) {
        self.column = column;
    }

    /// Editor level the focused row belongs to.
    pub fn focused_level(&self) -> Vec<usize> {
        self.focused_row()
            .map(|row| row.level.clone())
            .unwrap_or_default()
    }

    /// Level whose preview should accompany the root preview, if the cursor
    /// sits inside a nested editor.
    pub fn focused_nested_editor(&self) -> Option<(&str, &SchemaEditor)> {
        let row = self.focused_row()?;
        if row.level.is_empty() {
            return None;
        }
        let owner = self.parent_label(row);
        Some((owner, self.editor.editor_at(&row.level)?))
    }

    fn parent_label<'a>(&'a self, row: &'a RowView) -> &'a str {
        if row.is_add() {
            return &row.label;
        }
        row.label
            .rsplit_once('.')
            .map(|(parent, _)| parent)
            .unwrap_or(&row.label)
    }

    /// Forward a command to the editor at `level` and rebuild the rows.
    pub fn apply(&mut self, level: &[usize], command: EditorCommand) {
        self.editor.apply(level, command);
        self.dirty = true;
        self.refresh_rows();
    }

    /// Feed a key press into the focused key input. Returns whether the key
    /// changed.
    pub fn edit_focused_key(&mut self, key: &KeyEvent) -> bool {
        if self.column != FocusColumn::Key {
            return false;
        }
        let Some(row) = self.focused_row() else {
            return false;
        };
        let (Some(index), Some(current)) = (row.field_index(), row.key()) else {
            return false;
        };
        let mut buffer = current.to_string();
        if !handle_text_edit(&mut buffer, key) {
            return false;
        }
        let level = row.level.clone();
        self.apply(&level, EditorCommand::set_key(index, buffer));
        true
    }

    pub fn set_focused_type(&mut self, field_type: FieldType) -> bool {
        let Some(row) = self.focused_row() else {
            return false;
        };
        let Some(index) = row.field_index() else {
            return false;
        };
        let level = row.level.clone();
        self.apply(&level, EditorCommand::set_type(index, field_type));
        true
    }

    pub fn remove_focused(&mut self) -> bool {
        let Some(row) = self.focused_row() else {
            return false;
        };
        let Some(index) = row.field_index() else {
            return false;
        };
        let level = row.level.clone();
        self.apply(&level, EditorCommand::Remove { index });
        true
    }

    /// Append at the focused row's level and move the cursor onto the new row.
    pub fn append_at_focus(&mut self) {
        let level = self.focused_level();
        self.apply(&level, EditorCommand::Append);
        if let Some(position) = self
            .rows
            .iter()
            .position(|row| row.is_add() && row.level == level)
        {
            self.row_index = position.saturating_sub(1);
            self.column = FocusColumn::Key;
        }
    }

    fn refresh_rows(&mut self) {
        self.rows = collect_rows(&self.editor);
        self.row_index = self.row_index.min(self.rows.len().saturating_sub(1));
    }
}

#[cfg(test)]
impl FormState {
    pub(crate) fn set_row_index(&mut self, index: usize) {
        self.row_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::{Value, json};

    fn state() -> FormState {
        FormState::new(SchemaEditor::new(vec![
            Field::new("name", FieldType::String),
            Field::nested("address", vec![Field::new("city", FieldType::String)]),
        ]))
    }

    fn type_text(state: &mut FormState, text: &str) {
        for ch in text.chars() {
            state.edit_focused_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn row_focus_wraps() {
        let mut state = state();
        state.focus_row(-1);
        assert!(state.focused_row().unwrap().is_add());
        assert_eq!(state.focused_level(), Vec::<usize>::new());
        state.focus_row(1);
        assert_eq!(state.row_index(), 0);
    }

    #[test]
    fn column_focus_cycles_and_skips_add_rows() {
        let mut state = state();
        state.focus_column(1);
        assert_eq!(state.column(), FocusColumn::Type);
        state.focus_column(-2);
        assert_eq!(state.column(), FocusColumn::Remove);
        state.set_row_index(3);
        state.focus_column(1);
        assert_eq!(state.column(), FocusColumn::Remove);
    }

    #[test]
    fn typing_edits_nested_key_and_marks_dirty() {
        let mut state = state();
        state.set_row_index(2);
        type_text(&mut state, "_name");
        assert!(state.is_dirty());
        assert_eq!(
            Value::Object(state.editor().derive_json()),
            json!({"name": "", "address": {"city_name": ""}})
        );
        assert_eq!(state.focused_row().unwrap().label, "address.city_name");
    }

    #[test]
    fn append_focuses_the_new_row() {
        let mut state = state();
        state.set_row_index(2);
        state.append_at_focus();
        let row = state.focused_row().unwrap();
        assert_eq!(row.level, vec![1]);
        assert_eq!(row.field_index(), Some(1));
        assert_eq!(row.key(), Some(""));
    }

    #[test]
    fn removing_nested_field_drops_its_rows_and_clamps() {
        let mut state = state();
        state.set_row_index(1);
        assert!(state.remove_focused());
        assert_eq!(state.rows().len(), 2);
        assert_eq!(state.row_index(), 1);
        assert!(state.focused_row().unwrap().is_add());
    }

    #[test]
    fn nested_preview_follows_focus() {
        let mut state = state();
        assert!(state.focused_nested_editor().is_none());
        state.set_row_index(2);
        let (label, editor) = state.focused_nested_editor().unwrap();
        assert_eq!(label, "address");
        assert_eq!(editor.preview(2), "{\n  \"city\": \"\"\n}");
    }

    #[test]
    fn remove_on_add_row_is_ignored() {
        let mut state = state();
        state.set_row_index(4);
        assert!(!state.remove_focused());
        assert!(!state.is_dirty());
    }
}
