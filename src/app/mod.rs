mod builder_ui;
pub(crate) mod input;
pub(crate) mod keymap;
mod options;
mod popup;
mod runtime;
mod status;
mod terminal;

pub use builder_ui::SchemaBuilderUI;
pub use keymap::KeymapStore;
pub use options::UiOptions;
pub use runtime::BuildResult;
