use crate::{domain::FieldType, presentation::PopupRender};

/// Type selector opened on a field's type column.
pub(crate) struct TypePopup {
    title: String,
    options: Vec<String>,
    selected: usize,
}

impl TypePopup {
    pub(crate) fn new(label: &str, current: FieldType) -> Self {
        Self {
            title: format!("Type of {label}"),
            options: FieldType::ALL
                .iter()
                .map(|field_type| field_type.label().to_string())
                .collect(),
            selected: current.position(),
        }
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.options.len().saturating_sub(1));
    }

    pub(crate) fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len().max(1);
    }

    pub(crate) fn selection(&self) -> FieldType {
        FieldType::ALL[self.selected.min(FieldType::ALL.len() - 1)]
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            options: &self.options,
            selected: self.selected,
        }
    }
}
