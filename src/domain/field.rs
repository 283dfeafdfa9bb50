use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::tree::FieldTree;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Rendering identity of a field.
///
/// Ids are handed out by a process-wide monotonic counter, so two fields
/// never share one. They carry no meaning beyond identity and are never
/// serialized; deserialized fields receive fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    pub fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Nested,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::String, FieldType::Number, FieldType::Nested];

    pub fn label(self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Nested => "Nested",
        }
    }

    pub fn position(self) -> usize {
        match self {
            FieldType::String => 0,
            FieldType::Number => 1,
            FieldType::Nested => 2,
        }
    }

    /// Step through the variants in selector order, wrapping at both ends.
    pub fn cycle(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let next = (self.position() as i32 + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }

    pub fn is_nested(self) -> bool {
        matches!(self, FieldType::Nested)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Nested => "nested",
        };
        f.write_str(raw)
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldRecord")]
pub struct Field {
    #[serde(skip_serializing)]
    pub id: FieldId,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "FieldTree::is_empty")]
    pub children: FieldTree,
}

/// Serialized shape of a [`Field`]; ids are never read from input.
#[derive(Deserialize)]
struct FieldRecord {
    #[serde(default)]
    key: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    #[serde(default)]
    children: FieldTree,
}

impl From<FieldRecord> for Field {
    /// Children of a non-nested field are dropped.
    fn from(record: FieldRecord) -> Self {
        let children = if record.field_type.is_nested() {
            record.children
        } else {
            FieldTree::new()
        };
        Self {
            id: FieldId::next(),
            key: record.key,
            field_type: record.field_type,
            children,
        }
    }
}

impl Field {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: FieldId::next(),
            key: key.into(),
            field_type,
            children: FieldTree::new(),
        }
    }

    pub fn nested(key: impl Into<String>, children: impl Into<FieldTree>) -> Self {
        Self {
            children: children.into(),
            ..Self::new(key, FieldType::Nested)
        }
    }

    /// Human readable key, substituting a marker for the empty key.
    pub fn display_key(&self) -> &str {
        if self.key.is_empty() {
            "(unnamed)"
        } else {
            &self.key
        }
    }
}

/// A fresh row: empty key, `string` type, no children.
pub fn create_field() -> Field {
    Field::new("", FieldType::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_fields_start_empty() {
        let field = create_field();
        assert!(field.key.is_empty());
        assert_eq!(field.field_type, FieldType::String);
        assert!(field.children.is_empty());
    }

    #[test]
    fn created_fields_never_share_ids() {
        let ids: Vec<FieldId> = (0..64).map(|_| create_field().id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        assert_eq!(FieldType::String.cycle(1), FieldType::Number);
        assert_eq!(FieldType::Nested.cycle(1), FieldType::String);
        assert_eq!(FieldType::String.cycle(-1), FieldType::Nested);
        assert_eq!(FieldType::Number.cycle(4), FieldType::Nested);
    }

    #[test]
    fn deserialized_fields_get_fresh_ids() {
        let raw = r#"{"key":"name","type":"string"}"#;
        let first: Field = serde_json::from_str(raw).unwrap();
        let second: Field = serde_json::from_str(raw).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.key, "name");
    }

    #[test]
    fn scalar_fields_drop_serialized_children() {
        let raw = r#"{"key":"a","type":"string","children":[
            {"key":"b","type":"number","children":[{"key":"c"}]}
        ]}"#;
        let field: Field = serde_json::from_str(raw).unwrap();
        assert!(field.children.is_empty());

        let raw = r#"{"key":"a","type":"nested","children":[
            {"key":"b","type":"number","children":[{"key":"c"}]}
        ]}"#;
        let field: Field = serde_json::from_str(raw).unwrap();
        assert_eq!(field.children.len(), 1);
        assert!(field.children[0].children.is_empty());
    }

    #[test]
    fn serializes_type_in_lowercase() {
        let field = Field::new("age", FieldType::Number);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value, serde_json::json!({"key": "age", "type": "number"}));
    }
}
