use crate::domain::FieldType;

use super::editor::SchemaEditor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Field {
        index: usize,
        key: String,
        field_type: FieldType,
    },
    AddField,
}

/// One visible line of the editor, flattened depth-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Row indices of the nested fields leading to the owning editor.
    pub level: Vec<usize>,
    pub kind: RowKind,
    /// Dotted key path used for status and focus labels.
    pub label: String,
}

impl RowView {
    pub fn depth(&self) -> usize {
        self.level.len()
    }

    pub fn is_add(&self) -> bool {
        matches!(self.kind, RowKind::AddField)
    }

    pub fn field_index(&self) -> Option<usize> {
        match self.kind {
            RowKind::Field { index, .. } => Some(index),
            RowKind::AddField => None,
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self.kind {
            RowKind::Field { field_type, .. } => Some(field_type),
            RowKind::AddField => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            RowKind::Field { key, .. } => Some(key),
            RowKind::AddField => None,
        }
    }
}

/// Render the editor and every mounted nested editor into rows: each field,
/// then the rows of its nested editor, then the level's "add field" row.
pub fn collect_rows(editor: &SchemaEditor) -> Vec<RowView> {
    let mut rows = Vec::new();
    collect_level(editor, &mut Vec::new(), "", &mut rows);
    rows
}

fn collect_level(
    editor: &SchemaEditor,
    level: &mut Vec<usize>,
    parent_label: &str,
    rows: &mut Vec<RowView>,
) {
    for (index, field) in editor.fields().iter().enumerate() {
        let label = join_label(parent_label, field.display_key());
        rows.push(RowView {
            level: level.clone(),
            kind: RowKind::Field {
                index,
                key: field.key.clone(),
                field_type: field.field_type,
            },
            label: label.clone(),
        });
        if let Some(child) = editor.nested_editor(index) {
            level.push(index);
            collect_level(child, level, &label, rows);
            level.pop();
        }
    }
    rows.push(RowView {
        level: level.clone(),
        kind: RowKind::AddField,
        label: if parent_label.is_empty() {
            "root".to_string()
        } else {
            parent_label.to_string()
        },
    });
}

fn join_label(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;

    #[test]
    fn flattens_levels_depth_first() {
        let editor = SchemaEditor::new(vec![
            Field::new("name", FieldType::String),
            Field::nested("address", vec![Field::new("city", FieldType::String)]),
            Field::new("age", FieldType::Number),
        ]);
        let rows = collect_rows(&editor);
        let shape: Vec<(usize, Option<&str>)> =
            rows.iter().map(|row| (row.depth(), row.key())).collect();
        assert_eq!(
            shape,
            [
                (0, Some("name")),
                (0, Some("address")),
                (1, Some("city")),
                (1, None),
                (0, Some("age")),
                (0, None),
            ]
        );
        assert_eq!(rows[2].label, "address.city");
        assert_eq!(rows[3].level, vec![1]);
        assert_eq!(rows[5].label, "root");
    }

    #[test]
    fn freshly_nested_field_shows_one_blank_row() {
        let editor =
            SchemaEditor::new(vec![Field::nested("meta", crate::domain::FieldTree::new())]);
        let rows = collect_rows(&editor);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].label, "meta.(unnamed)");
        assert!(rows[2].is_add());
    }
}
