mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{fields_from_value, load_fields_str, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit, render_document};
