use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use crate::domain::{FieldTree, fields_from_document};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).context("failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).context("failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .context("failed to parse TOML document")
            .and_then(|table| {
                serde_json::to_value(table).context("failed to convert TOML to JSON")
            }),
    }
}

/// Seed tree from a parsed document.
///
/// An array is read as serialized fields
/// (`[{"key": "name", "type": "string"}, ...]`); an object is treated as an
/// example document and converted with [`fields_from_document`].
pub fn fields_from_value(value: Value) -> Result<FieldTree> {
    match value {
        Value::Array(_) => {
            let fields: FieldTree =
                serde_json::from_value(value).context("failed to read field list")?;
            debug!(fields = fields.len(), "loaded serialized field list");
            Ok(fields)
        }
        Value::Object(_) => {
            let fields = fields_from_document(&value);
            debug!(fields = fields.len(), "inferred fields from example document");
            Ok(fields)
        }
        other => bail!(
            "expected a field list or an example object, found {}",
            kind_name(&other)
        ),
    }
}

/// [`parse_document_str`] followed by [`fields_from_value`].
pub fn load_fields_str(contents: &str, format: DocumentFormat) -> Result<FieldTree> {
    fields_from_value(parse_document_str(contents, format)?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldType, derive_json};
    use crate::form::{EditorCommand, SchemaEditor};
    use serde_json::json;

    #[test]
    fn reads_serialized_field_lists() {
        let raw = r#"[
            {"key": "name", "type": "string"},
            {"key": "address", "type": "nested", "children": [{"key": "city"}]}
        ]"#;
        let fields = load_fields_str(raw, DocumentFormat::Json).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field_type, FieldType::Nested);
        assert_eq!(fields[1].children[0].field_type, FieldType::String);
        assert_eq!(
            Value::Object(derive_json(&fields)),
            json!({"name": "", "address": {"city": ""}})
        );
    }

    #[test]
    fn infers_fields_from_example_objects() {
        let fields = load_fields_str(r#"{"port": 80, "db": {"url": "x"}}"#, DocumentFormat::Json)
            .unwrap();
        assert_eq!(
            Value::Object(derive_json(&fields)),
            json!({"port": 0, "db": {"url": ""}})
        );
    }

    #[test]
    fn stray_children_do_not_resurface_when_nested_later() {
        let raw = r#"[{"key": "a", "type": "string", "children": [{"key": "b"}]}]"#;
        let fields = load_fields_str(raw, DocumentFormat::Json).unwrap();
        assert!(fields[0].children.is_empty());

        let mut editor = SchemaEditor::new(fields);
        editor.apply(&[], EditorCommand::set_type(0, FieldType::Nested));
        assert_eq!(Value::Object(editor.derive_json()), json!({"a": {}}));
    }

    #[test]
    fn rejects_scalar_documents() {
        let err = load_fields_str("42", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("found a number"));
    }

    #[test]
    fn rejects_unknown_types() {
        let err = load_fields_str(r#"[{"key": "a", "type": "bool"}]"#, DocumentFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("failed to read field list"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_documents() {
        let parsed = parse_document_str("enabled: true\nname: dev", DocumentFormat::Yaml).unwrap();
        assert_eq!(parsed["name"], json!("dev"));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_documents() {
        let parsed = parse_document_str("port = 8080", DocumentFormat::Toml).unwrap();
        assert_eq!(parsed["port"], json!(8080));

        let fields =
            load_fields_str("name = \"\"\n[address]\ncity = \"\"\n", DocumentFormat::Toml)
                .unwrap();
        assert_eq!(
            Value::Object(derive_json(&fields)),
            json!({"name": "", "address": {"city": ""}})
        );
    }
}
