use serde::Serialize;
use serde_json::{Map, Serializer, Value, ser::PrettyFormatter};

use super::field::{Field, FieldType};

/// Build the placeholder document described by `fields`.
///
/// Fields with an empty key are skipped. A later sibling with the same key
/// overwrites the earlier value but keeps the earlier insertion position.
pub fn derive_json(fields: &[Field]) -> Map<String, Value> {
    let mut document = Map::new();
    for field in fields {
        if field.key.is_empty() {
            continue;
        }
        let value = match field.field_type {
            FieldType::Nested => Value::Object(derive_json(&field.children)),
            FieldType::String => Value::String(String::new()),
            FieldType::Number => Value::from(0),
        };
        document.insert(field.key.clone(), value);
    }
    document
}

/// Pretty-printed [`derive_json`] output using `indent` spaces per level.
pub fn preview_text(fields: &[Field], indent: usize) -> String {
    let document = Value::Object(derive_json(fields));
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
    if document.serialize(&mut serializer).is_err() {
        return document.to_string();
    }
    String::from_utf8(buffer).unwrap_or_else(|_| document.to_string())
}
