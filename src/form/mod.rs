mod actions;
mod editor;
mod reducers;
mod rows;
mod state;
mod text;

pub use actions::FormCommand;
pub use editor::{ChangeCallback, EditorCommand, SchemaEditor};
pub use reducers::FormEngine;
pub use rows::{RowKind, RowView, collect_rows};
pub use state::{FocusColumn, FormState};
