use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::field::{Field, FieldId, FieldType, create_field};

/// A single property edit applied through [`FieldTree::set_field_property`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProperty {
    Key(String),
    Type(FieldType),
}

/// Ordered sequence of fields at one nesting level.
///
/// Every mutating operation addresses fields by position. Positions come from
/// the rendered rows, so an out-of-range index is a programming error and
/// panics instead of being reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTree(Vec<Field>);

impl FieldTree {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Field> {
        self.0
    }

    pub fn set_field_property(&mut self, index: usize, property: FieldProperty) {
        let field = self.field_mut(index);
        match property {
            FieldProperty::Key(key) => {
                trace!(index, key = %key, "set field key");
                field.key = key;
            }
            FieldProperty::Type(field_type) => {
                trace!(index, field_type = %field_type, "set field type");
                field.field_type = field_type;
                if !field_type.is_nested() {
                    field.children = FieldTree::new();
                }
            }
        }
    }

    pub fn append_field(&mut self) -> FieldId {
        let field = create_field();
        let id = field.id;
        self.0.push(field);
        trace!(id = %id, len = self.0.len(), "appended field");
        id
    }

    /// Remove the field at `index` together with its subtree.
    pub fn remove_field(&mut self, index: usize) -> Field {
        self.check_index(index);
        let removed = self.0.remove(index);
        trace!(index, id = %removed.id, len = self.0.len(), "removed field");
        removed
    }

    /// Replace the children of the field at `index` wholesale.
    pub fn set_children(&mut self, index: usize, children: FieldTree) {
        let field = self.field_mut(index);
        trace!(index, children = children.len(), "replaced children");
        field.children = children;
    }

    fn field_mut(&mut self, index: usize) -> &mut Field {
        self.check_index(index);
        &mut self.0[index]
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.0.len(),
            "field index {index} out of range for a level of {} field(s)",
            self.0.len()
        );
    }
}

impl Deref for FieldTree {
    type Target = [Field];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Field>> for FieldTree {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl FromIterator<Field> for FieldTree {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldTree {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldTree {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
