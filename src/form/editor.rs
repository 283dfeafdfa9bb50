use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{
    FieldId, FieldProperty, FieldTree, FieldType, create_field, derive_json, preview_text,
};

/// Observer invoked with the complete tree after every edit at or below an editor.
pub type ChangeCallback = Box<dyn FnMut(&FieldTree)>;

/// Edit addressed to one editor level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Update {
        index: usize,
        property: FieldProperty,
    },
    Remove {
        index: usize,
    },
    Append,
}

impl EditorCommand {
    pub fn set_key(index: usize, key: impl Into<String>) -> Self {
        EditorCommand::Update {
            index,
            property: FieldProperty::Key(key.into()),
        }
    }

    pub fn set_type(index: usize, field_type: FieldType) -> Self {
        EditorCommand::Update {
            index,
            property: FieldProperty::Type(field_type),
        }
    }
}

/// One level of the schema editor.
///
/// The editor owns its level's tree, copied from the seed once at
/// construction. Every `nested` field gets its own child editor, seeded from
/// that field's children when it is first mounted. A child never writes to the
/// parent directly: it hands its updated tree back and the parent stores it
/// with [`FieldTree::set_children`] before notifying its own observer.
pub struct SchemaEditor {
    fields: FieldTree,
    nested: IndexMap<FieldId, SchemaEditor>,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for SchemaEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEditor")
            .field("fields", &self.fields)
            .field("nested", &self.nested.keys().collect::<Vec<_>>())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Default for SchemaEditor {
    fn default() -> Self {
        Self::new(FieldTree::new())
    }
}

impl SchemaEditor {
    /// Seed an editor; an empty seed starts with one blank field.
    pub fn new(seed: impl Into<FieldTree>) -> Self {
        let seed = seed.into();
        let fields = if seed.is_empty() {
            FieldTree::from(vec![create_field()])
        } else {
            seed
        };
        let mut editor = Self {
            fields,
            nested: IndexMap::new(),
            on_change: None,
        };
        editor.mount_nested();
        editor
    }

    pub fn with_on_change(mut self, callback: impl FnMut(&FieldTree) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn set_on_change(&mut self, callback: Option<ChangeCallback>) {
        self.on_change = callback;
    }

    pub fn fields(&self) -> &FieldTree {
        &self.fields
    }

    /// Child editor mounted for the `nested` field at `index`.
    pub fn nested_editor(&self, index: usize) -> Option<&SchemaEditor> {
        let field = self.fields.get(index)?;
        self.nested.get(&field.id)
    }

    /// Walk `level` (row indices of nested fields) down to an editor.
    pub fn editor_at(&self, level: &[usize]) -> Option<&SchemaEditor> {
        match level.split_first() {
            None => Some(self),
            Some((&index, rest)) => self.nested_editor(index)?.editor_at(rest),
        }
    }

    pub fn derive_json(&self) -> Map<String, Value> {
        derive_json(&self.fields)
    }

    pub fn preview(&self, indent: usize) -> String {
        preview_text(&self.fields, indent)
    }

    /// Apply `command` to the editor reached through `level` and propagate
    /// the result upwards. Returns this level's updated tree.
    ///
    /// # Panics
    ///
    /// Panics when `level` or the command's index does not address an
    /// existing row.
    pub fn apply(&mut self, level: &[usize], command: EditorCommand) -> &FieldTree {
        match level.split_first() {
            None => self.apply_local(command),
            Some((&index, rest)) => {
                let len = self.fields.len();
                let id = self
                    .fields
                    .get(index)
                    .map(|field| field.id)
                    .unwrap_or_else(|| {
                        panic!("nested level {index} out of range for a level of {len} field(s)")
                    });
                let child = self.nested.get_mut(&id).unwrap_or_else(|| {
                    panic!("field {id} at index {index} has no nested editor mounted")
                });
                let reported = child.apply(rest, command).clone();
                debug!(index, depth = level.len(), "nested level reported change");
                self.fields.set_children(index, reported);
            }
        }
        self.notify();
        &self.fields
    }

    fn apply_local(&mut self, command: EditorCommand) {
        debug!(?command, len = self.fields.len(), "applying editor command");
        match command {
            EditorCommand::Update { index, property } => {
                self.fields.set_field_property(index, property)
            }
            EditorCommand::Remove { index } => {
                self.fields.remove_field(index);
            }
            EditorCommand::Append => {
                self.fields.append_field();
            }
        }
        self.mount_nested();
    }

    /// Unmount child editors whose field is gone or no longer nested, and
    /// mount one for every nested field that lacks one.
    fn mount_nested(&mut self) {
        let fields = &self.fields;
        self.nested.retain(|id, _| {
            fields
                .iter()
                .any(|field| field.id == *id && field.field_type.is_nested())
        });
        for field in fields.iter().filter(|field| field.field_type.is_nested()) {
            if !self.nested.contains_key(&field.id) {
                self.nested
                    .insert(field.id, SchemaEditor::new(field.children.clone()));
            }
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use serde_json::json;
    use std::{cell::RefCell, rc::Rc};

    fn recording_editor(seed: Vec<Field>) -> (SchemaEditor, Rc<RefCell<Vec<FieldTree>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let editor = SchemaEditor::new(seed)
            .with_on_change(move |tree| sink.borrow_mut().push(tree.clone()));
        (editor, seen)
    }

    #[test]
    fn empty_seed_starts_with_one_blank_field() {
        let editor = SchemaEditor::new(FieldTree::new());
        assert_eq!(editor.fields().len(), 1);
        assert!(editor.fields()[0].key.is_empty());
        assert_eq!(editor.derive_json(), Map::new());
    }

    #[test]
    fn seed_is_copied_verbatim() {
        let seed = vec![Field::new("name", FieldType::String)];
        let editor = SchemaEditor::new(seed.clone());
        assert_eq!(editor.fields().as_slice(), seed.as_slice());
    }

    #[test]
    fn every_local_edit_reports_full_tree() {
        let (mut editor, seen) = recording_editor(vec![]);
        editor.apply(&[], EditorCommand::set_key(0, "name"));
        editor.apply(&[], EditorCommand::Append);
        editor.apply(&[], EditorCommand::set_type(1, FieldType::Number));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].len(), 2);
        assert_eq!(seen[2][1].field_type, FieldType::Number);
    }

    #[test]
    fn nested_edits_propagate_to_root() {
        let (mut editor, seen) = recording_editor(vec![Field::new("address", FieldType::String)]);
        editor.apply(&[], EditorCommand::set_type(0, FieldType::Nested));
        assert!(editor.fields()[0].children.is_empty());
        assert_eq!(editor.nested_editor(0).map(|e| e.fields().len()), Some(1));

        editor.apply(&[0], EditorCommand::set_key(0, "city"));
        assert_eq!(
            Value::Object(editor.derive_json()),
            json!({"address": {"city": ""}})
        );
        let last = seen.borrow().last().cloned().unwrap();
        assert_eq!(last[0].children[0].key, "city");
    }

    #[test]
    fn deep_edits_update_every_ancestor() {
        let seed = vec![Field::nested(
            "a",
            vec![Field::nested("b", vec![Field::new("c", FieldType::String)])],
        )];
        let mut editor = SchemaEditor::new(seed);
        editor.apply(&[0, 0], EditorCommand::Append);
        editor.apply(&[0, 0], EditorCommand::set_key(1, "d"));
        editor.apply(&[0, 0], EditorCommand::set_type(1, FieldType::Number));
        assert_eq!(
            Value::Object(editor.derive_json()),
            json!({"a": {"b": {"c": "", "d": 0}}})
        );
        let middle = editor.nested_editor(0).unwrap();
        assert_eq!(middle.fields()[0].children.len(), 2);
    }

    #[test]
    fn leaving_nested_unmounts_child_editor() {
        let seed = vec![Field::nested(
            "address",
            vec![Field::new("city", FieldType::String)],
        )];
        let mut editor = SchemaEditor::new(seed);
        assert!(editor.nested_editor(0).is_some());
        editor.apply(&[], EditorCommand::set_type(0, FieldType::String));
        assert!(editor.nested_editor(0).is_none());
        assert!(editor.fields()[0].children.is_empty());

        editor.apply(&[], EditorCommand::set_type(0, FieldType::Nested));
        let remounted = editor.nested_editor(0).unwrap();
        assert_eq!(remounted.fields().len(), 1);
        assert!(remounted.fields()[0].key.is_empty());
    }

    #[test]
    fn removing_a_row_discards_its_subtree_editor() {
        let seed = vec![
            Field::nested("a", vec![Field::new("x", FieldType::String)]),
            Field::nested("b", vec![Field::new("y", FieldType::String)]),
        ];
        let mut editor = SchemaEditor::new(seed);
        editor.apply(&[], EditorCommand::Remove { index: 0 });
        let remaining = editor.nested_editor(0).unwrap();
        assert_eq!(remaining.fields()[0].key, "y");
        assert_eq!(Value::Object(editor.derive_json()), json!({"b": {"y": ""}}));
    }

    #[test]
    fn child_state_is_seeded_once() {
        let seed = vec![Field::nested(
            "address",
            vec![Field::new("city", FieldType::String)],
        )];
        let mut editor = SchemaEditor::new(seed);
        editor.apply(&[], EditorCommand::set_key(0, "home"));
        let child = editor.nested_editor(0).unwrap();
        assert_eq!(child.fields()[0].key, "city");
        assert!(editor.editor_at(&[0]).is_some());
        assert!(editor.editor_at(&[0, 0]).is_none());
    }

    #[test]
    #[should_panic(expected = "no nested editor")]
    fn addressing_a_flat_field_as_level_panics() {
        let mut editor = SchemaEditor::new(vec![Field::new("name", FieldType::String)]);
        editor.apply(&[0], EditorCommand::Append);
    }
}
