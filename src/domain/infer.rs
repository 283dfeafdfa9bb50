use serde_json::{Map, Value};

use super::{Field, FieldTree, FieldType};

/// Build a field tree whose derived document has the same shape as `document`.
///
/// Objects become `nested` fields, numbers become `number` fields and every
/// other value is treated as a `string`. A non-object root yields an empty
/// tree.
pub fn fields_from_document(document: &Value) -> FieldTree {
    match document {
        Value::Object(map) => fields_from_map(map),
        _ => FieldTree::new(),
    }
}

fn fields_from_map(map: &Map<String, Value>) -> FieldTree {
    map.iter()
        .map(|(key, value)| match value {
            Value::Object(inner) => Field::nested(key.clone(), fields_from_map(inner)),
            Value::Number(_) => Field::new(key.clone(), FieldType::Number),
            _ => Field::new(key.clone(), FieldType::String),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::derive_json;
    use serde_json::json;

    #[test]
    fn maps_value_kinds_onto_field_types() {
        let tree = fields_from_document(&json!({
            "name": "svc",
            "port": 8080,
            "tls": true,
            "tags": ["a"],
            "db": {"url": "x", "pool": 4}
        }));
        let types: Vec<_> = tree.iter().map(|f| (f.key.as_str(), f.field_type)).collect();
        assert_eq!(
            types,
            [
                ("name", FieldType::String),
                ("port", FieldType::Number),
                ("tls", FieldType::String),
                ("tags", FieldType::String),
                ("db", FieldType::Nested),
            ]
        );
        assert_eq!(tree[4].children.len(), 2);
    }

    #[test]
    fn derived_document_round_trips_through_inference() {
        let original = FieldTree::from(vec![
            Field::new("name", FieldType::String),
            Field::nested(
                "address",
                vec![
                    Field::new("city", FieldType::String),
                    Field::new("zip", FieldType::Number),
                ],
            ),
            Field::nested("empty", FieldTree::new()),
        ]);
        let derived = Value::Object(derive_json(&original));
        let rebuilt = fields_from_document(&derived);
        assert_eq!(Value::Object(derive_json(&rebuilt)), derived);
    }

    #[test]
    fn scalar_roots_produce_no_fields() {
        assert!(fields_from_document(&json!(42)).is_empty());
        assert!(fields_from_document(&json!(["a"])).is_empty());
    }
}
