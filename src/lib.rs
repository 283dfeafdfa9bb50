#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod presentation;

pub use app::{BuildResult, KeymapStore, SchemaBuilderUI, UiOptions};
pub use domain::{
    Field, FieldId, FieldProperty, FieldTree, FieldType, create_field, derive_json,
    fields_from_document, preview_text,
};
pub use form::{ChangeCallback, EditorCommand, SchemaEditor};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, fields_from_value, load_fields_str,
    parse_document_str, render_document,
};

pub mod prelude {
    pub use super::{
        BuildResult, Field, FieldTree, FieldType, SchemaBuilderUI, SchemaEditor, UiOptions,
        derive_json,
    };
}
