use crossterm::event::KeyEvent;

use crate::domain::FieldType;

#[derive(Debug, Clone)]
pub enum FormCommand {
    FocusRow(i32),
    FocusColumn(i32),
    CycleType(i32),
    SetType(FieldType),
    AppendField,
    RemoveField,
    EditKey(KeyEvent),
}
