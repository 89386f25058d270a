//! JSON Schema documents generated from CDL.

mod generator;

pub use generator::{
    SchemaGenerator, DEFAULT_BASE_URL, GEOMETRY_TYPES, IDENTIFIER_PATTERN,
    NODE_COORDINATES_PATTERN, SCHEMA_DIALECT,
};

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::domain::Domain;
use crate::error::Result;

/// File suffix of generated schemas.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// A generated schema together with its routing information.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Domain the schema was classified into.
    pub domain: Domain,
    /// File name / `$id` leaf, e.g. `coil-current.schema.json`.
    pub schema_id: String,
    /// The JSON Schema itself.
    pub body: Value,
}

impl SchemaDocument {
    /// Location of this schema under an output root: `<root>/<domain>/<schema_id>`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(self.domain.label()).join(&self.schema_id)
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.body)?;
        text.push('\n');
        Ok(text)
    }
}

/// Schema id for a CDL file: the stem with `_` replaced by `-`, plus
/// [`SCHEMA_SUFFIX`].
pub fn schema_id_for_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(format!("{}{}", stem.replace('_', "-"), SCHEMA_SUFFIX))
}
