use std::{sync::Arc, time::Duration};

use anyhow::Result;

use super::keymap::{self, KeymapStore};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Show the focused nested level's own preview under the root preview.
    pub show_level_preview: bool,
    /// Spaces per indentation level in the JSON preview.
    pub preview_indent: usize,
    pub(crate) keymap: Arc<KeymapStore>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            show_level_preview: true,
            preview_indent: 2,
            keymap: keymap::default_store(),
        }
    }
}

impl UiOptions {
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_level_preview(mut self, show: bool) -> Self {
        self.show_level_preview = show;
        self
    }

    pub fn with_preview_indent(mut self, indent: usize) -> Self {
        self.preview_indent = indent;
        self
    }

    /// Replace the default bindings with a keymap in the
    /// `keymap/default.keymap.json` format.
    pub fn with_keymap_json(mut self, source: &str) -> Result<Self> {
        self.keymap = Arc::new(KeymapStore::from_json(source)?);
        Ok(self)
    }
}
