//! Naming and unit conventions for dataset metadata.
//!
//! [`validate_value`] dispatches a JSON value to the matching model; each
//! model runs the shared [`StandardAttrs`] rule on its attributes.

mod attrs;
mod coords;
mod error;
mod models;

pub use attrs::{StandardAttrs, SPECIAL_UNITS};
pub use coords::{Coordinate, CoordinateSet};
pub use error::{AttrsError, PolicyKind, ValidationError};
pub use models::{DataArrayModel, DatasetModel};

use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::error::{CdlSchemaError, Result};
use crate::units::UnitRegistry;

/// What [`validate_value`] recognised and accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedShape {
    /// Object with `data_vars`.
    Dataset(DatasetModel),
    /// Object with `data`.
    DataArray(DataArrayModel),
    /// Object with only `coords`.
    Coordinates(CoordinateSet),
    /// Object with `standard_name` and/or `units`.
    Attributes(StandardAttrs),
}

impl ValidatedShape {
    /// Human-readable shape name.
    pub fn label(&self) -> &'static str {
        match self {
            ValidatedShape::Dataset(_) => "dataset",
            ValidatedShape::DataArray(_) => "data array",
            ValidatedShape::Coordinates(_) => "coordinates",
            ValidatedShape::Attributes(_) => "standard attributes",
        }
    }
}

impl fmt::Display for ValidatedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validate a dataset, data array, coordinate set or standalone attribute pair.
pub fn validate_value(
    value: &Value,
    registry: &UnitRegistry,
) -> std::result::Result<ValidatedShape, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::UnsupportedShape)?;

    let shape = if object.contains_key("data_vars") {
        ValidatedShape::Dataset(DatasetModel::from_value(value, registry)?)
    } else if object.contains_key("data") {
        ValidatedShape::DataArray(DataArrayModel::from_value(value, registry)?)
    } else if let Some(coords) = object.get("coords") {
        ValidatedShape::Coordinates(CoordinateSet::from_value(coords, registry)?)
    } else if object.contains_key("standard_name") || object.contains_key("units") {
        let attrs = StandardAttrs::from_attrs(object)?;
        attrs.validate(registry)?;
        ValidatedShape::Attributes(attrs)
    } else {
        return Err(ValidationError::UnsupportedShape);
    };

    tracing::debug!(%shape, "Validated value");
    Ok(shape)
}

/// Read a JSON file and validate it with [`validate_value`].
pub fn validate_file(path: &Path, registry: &UnitRegistry) -> Result<ValidatedShape> {
    let text =
        std::fs::read_to_string(path).map_err(|e| CdlSchemaError::file_read(path, e))?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(validate_value(&value, registry)?)
}
