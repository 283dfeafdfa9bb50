mod derive;
mod field;
mod infer;
mod tree;

pub use derive::{derive_json, preview_text};
pub use field::{Field, FieldId, FieldType, create_field};
pub use infer::fields_from_document;
pub use tree::{FieldProperty, FieldTree};
