use tracing::debug;

use crate::domain::FieldType;

use super::{actions::FormCommand, state::FormState};

/// Applies [`FormCommand`]s to a [`FormState`] and describes the outcome for
/// the status line.
pub struct FormEngine<'a> {
    state: &'a mut FormState,
}

impl<'a> FormEngine<'a> {
    pub fn new(state: &'a mut FormState) -> Self {
        Self { state }
    }

    /// `Ok(Some(message))` reports an edit, `Ok(None)` a focus move or no-op,
    /// `Err` a command that does not apply to the focused row.
    pub fn dispatch(&mut self, command: FormCommand) -> Result<Option<String>, String> {
        debug!(?command, row = self.state.row_index(), "form command");
        match command {
            FormCommand::FocusRow(delta) => {
                self.state.focus_row(delta);
                Ok(None)
            }
            FormCommand::FocusColumn(delta) => {
                self.state.focus_column(delta);
                Ok(None)
            }
            FormCommand::CycleType(delta) => {
                let current = self
                    .state
                    .focused_row()
                    .and_then(|row| row.field_type())
                    .ok_or_else(|| "Select a field to change its type".to_string())?;
                self.set_type(current.cycle(delta))
            }
            FormCommand::SetType(field_type) => self.set_type(field_type),
            FormCommand::AppendField => {
                self.state.append_at_focus();
                let label = self
                    .state
                    .focused_row()
                    .map(|row| row.label.clone())
                    .unwrap_or_default();
                Ok(Some(format!("Added {label}")))
            }
            FormCommand::RemoveField => {
                let label = self
                    .state
                    .focused_row()
                    .filter(|row| !row.is_add())
                    .map(|row| row.label.clone())
                    .ok_or_else(|| "Nothing to remove here".to_string())?;
                self.state.remove_focused();
                Ok(Some(format!("Removed {label}")))
            }
            FormCommand::EditKey(key) => {
                if self.state.edit_focused_key(&key) {
                    let label = self
                        .state
                        .focused_row()
                        .map(|row| row.label.clone())
                        .unwrap_or_default();
                    Ok(Some(format!("Editing {label}")))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn set_type(&mut self, field_type: FieldType) -> Result<Option<String>, String> {
        if !self.state.set_focused_type(field_type) {
            return Err("Select a field to change its type".to_string());
        }
        let label = self
            .state
            .focused_row()
            .map(|row| row.label.clone())
            .unwrap_or_default();
        Ok(Some(format!("{label} is now {field_type}")))
    }
}
