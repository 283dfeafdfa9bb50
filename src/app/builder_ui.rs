use anyhow::Result;
use tracing::info;

use crate::{
    domain::FieldTree,
    form::{FormState, SchemaEditor},
};

use super::{
    options::UiOptions,
    runtime::{App, BuildResult},
};

const DEFAULT_TITLE: &str = "JSON Schema Builder";

/// Entry point for running the builder in the terminal.
pub struct SchemaBuilderUI {
    fields: FieldTree,
    title: Option<String>,
    options: UiOptions,
    on_change: Option<Box<dyn FnMut(&FieldTree)>>,
}

impl std::fmt::Debug for SchemaBuilderUI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaBuilderUI")
            .field("fields", &self.fields)
            .field("title", &self.title)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for SchemaBuilderUI {
    fn default() -> Self {
        Self::new(FieldTree::new())
    }
}

impl SchemaBuilderUI {
    /// Seed the builder; an empty tree starts with one blank field.
    pub fn new(fields: impl Into<FieldTree>) -> Self {
        Self {
            fields: fields.into(),
            title: None,
            options: UiOptions::default(),
            on_change: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Observe the whole tree after every edit.
    pub fn with_on_change(mut self, callback: impl FnMut(&FieldTree) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn run(self) -> Result<BuildResult> {
        let SchemaBuilderUI {
            fields,
            title,
            options,
            on_change,
        } = self;

        info!(seed_fields = fields.len(), "starting schema builder");
        let mut editor = SchemaEditor::new(fields);
        editor.set_on_change(on_change);
        let form_state = FormState::new(editor);
        let title = title.unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let mut app = App::new(form_state, options, title);
        app.run()
    }
}
