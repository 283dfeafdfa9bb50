use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use schemabuilder::{
    DocumentFormat, FieldTree, OutputDestination, OutputOptions, SchemaBuilderUI, emit,
    fields_from_value, parse_document_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "schemabuilder",
    version,
    about = "Build nested key/type field trees in the terminal and emit the derived JSON"
)]
struct Cli {
    /// Seed fields: file path, inline payload, or "-" for stdin. Accepts a
    /// field list or an example document
    #[arg(long = "fields", value_name = "SPEC")]
    fields: Option<String>,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Defaults to stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        num_args = 1..,
        action = ArgAction::Append
    )]
    outputs: Vec<String>,

    /// Output format; inferred from output file extensions when omitted
    #[arg(long = "format", value_name = "FORMAT", value_parser = parse_format)]
    format: Option<DocumentFormat>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write logs to this file; the terminal belongs to the UI
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "schemabuilder=trace" (defaults to RUST_LOG)
    #[arg(long = "log-level", value_name = "FILTER", requires = "log_file")]
    log_level: Option<String>,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut diagnostics = DiagnosticCollector::default();

    let seed_hint = cli
        .fields
        .as_deref()
        .filter(|spec| *spec != "-")
        .and_then(|spec| format_from_path(Path::new(spec)));
    let seed = load_seed(
        cli.fields.as_deref(),
        seed_hint.unwrap_or_default(),
        &mut diagnostics,
    );

    let output = build_output_options(&cli, seed_hint, &mut diagnostics);
    ensure_output_paths_available(&output.destinations, cli.force, &mut diagnostics);

    diagnostics.into_result()?;

    let mut ui = SchemaBuilderUI::new(seed.unwrap_or_default());
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }

    let result = ui.run().map_err(|err| eyre!("{err:#}"))?;
    info!(fields = result.fields.len(), "builder session saved");
    emit(&result.document, &output).map_err(|err| eyre!("{err:#}"))?;

    Ok(())
}

fn parse_format(raw: &str) -> std::result::Result<DocumentFormat, String> {
    raw.parse::<DocumentFormat>().map_err(|err| err.to_string())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = match cli.log_level.as_deref() {
        Some(directive) => EnvFilter::try_new(directive)
            .wrap_err_with(|| format!("invalid --log-level '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;
    debug!(path = %path.display(), "logging initialised");
    Ok(())
}

fn load_seed(
    spec: Option<&str>,
    format: DocumentFormat,
    diagnostics: &mut DiagnosticCollector,
) -> Option<FieldTree> {
    let raw = spec?;
    let fields = load_value(raw, format).and_then(|value| {
        fields_from_value(value).map_err(|err| eyre!("{err:#}"))
    });
    match fields {
        Ok(fields) => {
            debug!(fields = fields.len(), "loaded seed fields");
            Some(fields)
        }
        Err(err) => {
            diagnostics.push_input("fields", err.to_string());
            None
        }
    }
}

fn load_value(spec: &str, format: DocumentFormat) -> Result<serde_json::Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, "fields from stdin");
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, "fields"),
        Err(err) if is_not_found(&err) => parse_contents(spec, format, "inline fields"),
        Err(err) => Err(err.wrap_err(format!("failed to load fields from {}", path.display()))),
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

/// Parse with the hinted format first, then every other compiled-in format.
fn parse_contents(
    contents: &str,
    format: DocumentFormat,
    label: &str,
) -> Result<serde_json::Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => DocumentFormat::available_formats()
            .into_iter()
            .filter(|candidate| *candidate != format)
            .find_map(|candidate| parse_document_str(contents, candidate).ok())
            .ok_or_else(|| {
                eyre!(
                    "failed to parse {label}: tried {} (first error: {primary:#})",
                    format_list()
                )
            }),
    }
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_from_path(path: &Path) -> Option<DocumentFormat> {
    let extension = path.extension()?.to_string_lossy();
    DocumentFormat::from_extension(&extension)
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    cli: &Cli,
    seed_hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> OutputOptions {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
        } else if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let format = cli
        .format
        .or_else(|| infer_format_from_files(&destinations, diagnostics))
        .or(seed_hint)
        .unwrap_or_default();

    OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations)
}

fn infer_format_from_files(
    destinations: &[OutputDestination],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for destination in destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        match (format_from_path(path), detected) {
            (Some(format), Some(existing)) if format != existing => {
                diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions or pass --format",
                    path.display()
                ));
            }
            (Some(format), None) => detected = Some(format),
            (Some(_), Some(_)) => {}
            (None, _) => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use one of {} or pass --format",
                path.display(),
                format_list()
            )),
        }
    }
    detected
}

fn ensure_output_paths_available(
    destinations: &[OutputDestination],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for destination in destinations {
        if let OutputDestination::File(path) = destination
            && path.exists()
        {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}
