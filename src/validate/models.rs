//! Data-array and dataset models, shaped like xarray's `to_dict` output.

use serde_json::{Map, Value};

use crate::units::UnitRegistry;
use crate::validate::attrs::StandardAttrs;
use crate::validate::coords::CoordinateSet;
use crate::validate::error::ValidationError;

/// A validated labelled array.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArrayModel {
    /// Dimension names; may be empty.
    pub dims: Vec<String>,
    /// Coordinates, empty when absent.
    pub coords: CoordinateSet,
    /// Attributes, already checked with [`StandardAttrs`].
    pub attrs: Map<String, Value>,
    /// Values of any JSON type.
    pub data: Vec<Value>,
}

impl DataArrayModel {
    /// Read and validate from a JSON object.
    ///
    /// Fields are checked in order: `dims`, `coords`, `attrs`, `data`.
    pub fn from_value(value: &Value, registry: &UnitRegistry) -> Result<Self, ValidationError> {
        let object = as_object(value, "data array")?;

        let dims = match object.get("dims") {
            None => return Err(ValidationError::missing("dims")),
            Some(Value::Array(items)) => read_dim_names(items)?,
            Some(_) => return Err(ValidationError::invalid("dims", "Input should be a valid list")),
        };

        let coords = match object.get("coords") {
            Some(coords) => CoordinateSet::from_value(coords, registry)?,
            None => CoordinateSet::default(),
        };

        let attrs = required_object(object, "attrs")?;
        StandardAttrs::from_attrs(&attrs)?.validate(registry)?;

        let data = match object.get("data") {
            None => return Err(ValidationError::missing("data")),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => return Err(ValidationError::invalid("data", "Input should be a valid list")),
        };

        Ok(Self {
            dims,
            coords,
            attrs,
            data,
        })
    }
}

/// A validated collection of data arrays sharing dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetModel {
    /// Dimension sizes in declaration order.
    pub dims: Vec<(String, u64)>,
    /// Shared coordinates.
    pub coords: CoordinateSet,
    /// Data variables in declaration order.
    pub data_vars: Vec<(String, DataArrayModel)>,
    /// Dataset attributes (not subject to the standard-name rule).
    pub attrs: Map<String, Value>,
}

impl DatasetModel {
    /// Read and validate from a JSON object.
    pub fn from_value(value: &Value, registry: &UnitRegistry) -> Result<Self, ValidationError> {
        let object = as_object(value, "dataset")?;

        let dims = match object.get("dims") {
            None => return Err(ValidationError::missing("dims")),
            Some(Value::Object(sizes)) => read_dim_sizes(sizes)?,
            Some(_) => return Err(ValidationError::invalid("dims", "Input should be a valid dictionary")),
        };

        let coords = match object.get("coords") {
            Some(coords) => CoordinateSet::from_value(coords, registry)?,
            None => CoordinateSet::default(),
        };

        let vars = required_object(object, "data_vars")?;
        let mut data_vars = Vec::with_capacity(vars.len());
        for (name, var) in &vars {
            let model = DataArrayModel::from_value(var, registry)
                .map_err(|err| ValidationError::nested(format!("data_vars.{}", name), err))?;
            data_vars.push((name.clone(), model));
        }

        let attrs = match object.get("attrs") {
            None | Some(Value::Null) => Map::new(),
            Some(_) => required_object(object, "attrs")?,
        };

        Ok(Self {
            dims,
            coords,
            data_vars,
            attrs,
        })
    }

    /// Size of a dimension.
    pub fn dim_size(&self, name: &str) -> Option<u64> {
        self.dims
            .iter()
            .find(|(dim, _)| dim == name)
            .map(|(_, size)| *size)
    }

    /// Look up a data variable.
    pub fn data_var(&self, name: &str) -> Option<&DataArrayModel> {
        self.data_vars
            .iter()
            .find(|(var, _)| var == name)
            .map(|(_, model)| model)
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::invalid(what, "Input should be a valid dictionary"))
}

fn required_object(object: &Map<String, Value>, field: &str) -> Result<Map<String, Value>, ValidationError> {
    match object.get(field) {
        None => Err(ValidationError::missing(field)),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(ValidationError::invalid(field, "Input should be a valid dictionary")),
    }
}

fn read_dim_names(items: &[Value]) -> Result<Vec<String>, ValidationError> {
    items
        .iter()
        .map(|item| match item {
            Value::String(name) if !name.trim().is_empty() => Ok(name.clone()),
            Value::String(_) => Err(ValidationError::InvalidDimensionName),
            _ => Err(ValidationError::invalid("dims", "Input should be a valid string")),
        })
        .collect()
}

fn read_dim_sizes(sizes: &Map<String, Value>) -> Result<Vec<(String, u64)>, ValidationError> {
    sizes
        .iter()
        .map(|(name, size)| {
            if name.trim().is_empty() {
                return Err(ValidationError::InvalidDimensionName);
            }
            size.as_u64()
                .map(|size| (name.clone(), size))
                .ok_or_else(|| ValidationError::InvalidDimensionSize { name: name.clone() })
        })
        .collect()
}
