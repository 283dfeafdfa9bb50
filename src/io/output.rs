use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use super::DocumentFormat;

/// Where the saved document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    fn describe(&self) -> String {
        match self {
            OutputDestination::Stdout => "stdout".to_string(),
            OutputDestination::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serialize `document` once and write it to every configured destination.
pub fn emit(document: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = render_document(document, options.format, options.pretty)?;
    for destination in &options.destinations {
        write_payload(destination, &payload)
            .with_context(|| format!("failed to write to {}", destination.describe()))?;
        info!(destination = %destination.describe(), format = %options.format, "emitted document");
    }
    Ok(())
}

/// Text form of `document` in `format`, without a trailing newline.
pub fn render_document(document: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(document)?,
        DocumentFormat::Json => serde_json::to_string(document)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(document)
            .context("failed to serialize YAML")?
            .trim_end()
            .to_string(),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(document)
            .context("failed to serialize TOML")?
            .trim_end()
            .to_string(),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(document)
            .context("failed to serialize TOML")?
            .trim_end()
            .to_string(),
    };
    Ok(rendered)
}

fn write_payload(destination: &OutputDestination, payload: &str) -> io::Result<()> {
    let mut writer: Box<dyn Write> = match destination {
        OutputDestination::Stdout => Box::new(io::stdout().lock()),
        OutputDestination::File(path) => Box::new(File::create(path)?),
    };
    writeln!(writer, "{payload}")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn no_destinations_is_a_noop() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"ok": ""}), &options).unwrap();
    }

    #[test]
    fn compact_json_has_no_newlines() {
        let rendered =
            render_document(&json!({"a": {"b": 0}}), DocumentFormat::Json, false).unwrap();
        assert_eq!(rendered, r#"{"a":{"b":0}}"#);
    }

    #[test]
    fn pretty_json_keeps_field_order() {
        let rendered =
            render_document(&json!({"name": "", "age": 0}), DocumentFormat::Json, true).unwrap();
        assert_eq!(rendered, "{\n  \"name\": \"\",\n  \"age\": 0\n}");
    }

    #[test]
    fn writes_to_file_destination() {
        let path = std::env::temp_dir().join(format!(
            "schemabuilder-test-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let options =
            OutputOptions::default().with_destinations(vec![OutputDestination::file(&path)]);
        emit(&json!({"address": {"city": ""}}), &options).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"city\""));
        assert!(contents.ends_with("}\n"));
        let _ = fs::remove_file(path);
    }
}
