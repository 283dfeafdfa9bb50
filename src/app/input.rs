use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::form::{FocusColumn, FormCommand, RowView};

use super::keymap::{KeymapContext, KeymapStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Save,
    Quit,
    ResetStatus,
    Activate,
    AppendField,
    RemoveField,
    RowStep(i32),
    ColumnStep(i32),
    CycleType(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppCommand {
    Save,
    Quit,
    ResetStatus,
    Activate,
}

#[derive(Debug, Clone)]
pub(crate) enum CommandDispatch {
    Form(FormCommand),
    App(AppCommand),
    Input(KeyEvent),
}

/// Resolves raw key events against the keymap for the focused row.
#[derive(Debug, Clone)]
pub(crate) struct InputRouter {
    keymap: Arc<KeymapStore>,
}

impl InputRouter {
    pub(crate) fn new(keymap: Arc<KeymapStore>) -> Self {
        Self { keymap }
    }

    pub(crate) fn contexts(row: Option<&RowView>, column: FocusColumn) -> Vec<KeymapContext> {
        match row {
            Some(row) if row.is_add() => vec![KeymapContext::Add],
            Some(_) if column == FocusColumn::Type => {
                vec![KeymapContext::Field, KeymapContext::Type]
            }
            Some(_) => vec![KeymapContext::Field],
            None => vec![KeymapContext::Add],
        }
    }

    pub(crate) fn classify(
        &self,
        key: &KeyEvent,
        row: Option<&RowView>,
        column: FocusColumn,
    ) -> CommandDispatch {
        let contexts = Self::contexts(row, column);
        match self.keymap.classify(key, &contexts) {
            Some(action) => dispatch_for(action),
            None => CommandDispatch::Input(*key),
        }
    }

    pub(crate) fn help_text(&self, row: Option<&RowView>, column: FocusColumn) -> Option<String> {
        self.keymap.help_text(&Self::contexts(row, column))
    }
}

fn dispatch_for(action: KeyAction) -> CommandDispatch {
    match action {
        KeyAction::Save => CommandDispatch::App(AppCommand::Save),
        KeyAction::Quit => CommandDispatch::App(AppCommand::Quit),
        KeyAction::ResetStatus => CommandDispatch::App(AppCommand::ResetStatus),
        KeyAction::Activate => CommandDispatch::App(AppCommand::Activate),
        KeyAction::AppendField => CommandDispatch::Form(FormCommand::AppendField),
        KeyAction::RemoveField => CommandDispatch::Form(FormCommand::RemoveField),
        KeyAction::RowStep(delta) => CommandDispatch::Form(FormCommand::FocusRow(delta)),
        KeyAction::ColumnStep(delta) => CommandDispatch::Form(FormCommand::FocusColumn(delta)),
        KeyAction::CycleType(delta) => CommandDispatch::Form(FormCommand::CycleType(delta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Field, FieldType},
        form::{SchemaEditor, collect_rows},
    };
    use crossterm::event::{KeyCode, KeyModifiers};

    fn rows() -> Vec<RowView> {
        collect_rows(&SchemaEditor::new(vec![Field::new("name", FieldType::String)]))
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn unbound_keys_fall_through_as_input() {
        let router = InputRouter::new(super::super::keymap::default_store());
        let rows = rows();
        let dispatch = router.classify(
            &key(KeyCode::Char('x'), KeyModifiers::NONE),
            rows.first(),
            FocusColumn::Key,
        );
        assert!(matches!(dispatch, CommandDispatch::Input(_)));
    }

    #[test]
    fn arrows_cycle_type_only_on_type_column() {
        let router = InputRouter::new(super::super::keymap::default_store());
        let rows = rows();
        let right = key(KeyCode::Right, KeyModifiers::NONE);
        assert!(matches!(
            router.classify(&right, rows.first(), FocusColumn::Type),
            CommandDispatch::Form(FormCommand::CycleType(1))
        ));
        assert!(matches!(
            router.classify(&right, rows.first(), FocusColumn::Key),
            CommandDispatch::Input(_)
        ));
    }

    #[test]
    fn enter_activates_on_add_row() {
        let router = InputRouter::new(super::super::keymap::default_store());
        let rows = rows();
        let dispatch = router.classify(
            &key(KeyCode::Enter, KeyModifiers::NONE),
            rows.last(),
            FocusColumn::Key,
        );
        assert!(matches!(dispatch, CommandDispatch::App(AppCommand::Activate)));
    }
}
