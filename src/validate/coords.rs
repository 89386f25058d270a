//! xarray-style coordinates.

use serde_json::{Map, Value};

use crate::units::UnitRegistry;
use crate::validate::attrs::StandardAttrs;
use crate::validate::error::ValidationError;

/// One coordinate entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    /// A bare list of scalar values.
    Values(Vec<Value>),
    /// Dimension names, values and attributes.
    Full {
        /// Dimension names (a single string is one dimension).
        dims: Vec<String>,
        /// Coordinate values.
        values: Vec<Value>,
        /// Coordinate attributes.
        attrs: Map<String, Value>,
    },
}

impl Coordinate {
    /// Read a coordinate from JSON.
    ///
    /// Accepts an array of scalars, a `[dims, values, attrs]` triple, or an
    /// xarray `to_dict` object with `dims`, `data` and optional `attrs`.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ValidationError> {
        let parsed = match value {
            Value::Array(items) => Self::from_triple(items).or_else(|| {
                items
                    .iter()
                    .all(is_scalar)
                    .then(|| Coordinate::Values(items.clone()))
            }),
            Value::Object(fields) => Self::from_object(fields),
            _ => None,
        };

        parsed.ok_or_else(|| ValidationError::InvalidCoordinate {
            name: name.to_string(),
            definition: value.to_string(),
        })
    }

    fn from_triple(items: &[Value]) -> Option<Self> {
        match items {
            [dims, Value::Array(values), Value::Object(attrs)] => Some(Coordinate::Full {
                dims: read_dims(dims)?,
                values: values.clone(),
                attrs: attrs.clone(),
            }),
            _ => None,
        }
    }

    fn from_object(fields: &Map<String, Value>) -> Option<Self> {
        let dims = read_dims(fields.get("dims")?)?;
        let values = fields.get("data")?.as_array()?.clone();
        let attrs = match fields.get("attrs") {
            None | Some(Value::Null) => Map::new(),
            Some(value) => value.as_object()?.clone(),
        };
        Some(Coordinate::Full { dims, values, attrs })
    }

    /// Dimension names, empty for the bare form.
    pub fn dims(&self) -> &[String] {
        match self {
            Coordinate::Values(_) => &[],
            Coordinate::Full { dims, .. } => dims,
        }
    }

    /// Coordinate values.
    pub fn values(&self) -> &[Value] {
        match self {
            Coordinate::Values(values) | Coordinate::Full { values, .. } => values,
        }
    }

    /// Attributes, if the coordinate carries any.
    pub fn attrs(&self) -> Option<&Map<String, Value>> {
        match self {
            Coordinate::Values(_) => None,
            Coordinate::Full { attrs, .. } => Some(attrs),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn read_dims(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(dim) => Some(vec![dim.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Named coordinates in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateSet {
    entries: Vec<(String, Coordinate)>,
}

impl CoordinateSet {
    /// Read and validate a `coords` object. `null` is an empty set.
    pub fn from_value(value: &Value, registry: &UnitRegistry) -> Result<Self, ValidationError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            _ => return Err(ValidationError::invalid("coords", "Input should be a valid dictionary")),
        };

        let mut entries = Vec::with_capacity(object.len());
        for (name, raw) in object {
            let coordinate = Coordinate::from_value(name, raw)?;
            if let Some(attrs) = coordinate.attrs() {
                StandardAttrs::from_attrs(attrs)
                    .and_then(|standard| standard.validate(registry).map_err(ValidationError::from))
                    .map_err(|err| ValidationError::nested(format!("coords.{}", name), err))?;
            }
            entries.push((name.clone(), coordinate));
        }

        Ok(Self { entries })
    }

    /// Look up a coordinate by name.
    pub fn get(&self, name: &str) -> Option<&Coordinate> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, coordinate)| coordinate)
    }

    /// Coordinates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no coordinates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension names of the full-form coordinates, in order.
    pub fn dims(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|(_, coordinate)| coordinate.dims())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::error::{AttrsError, PolicyKind};
    use serde_json::json;

    fn coords(value: Value) -> Result<CoordinateSet, ValidationError> {
        CoordinateSet::from_value(&value, UnitRegistry::shared())
    }

    #[test]
    fn empty_coords_are_valid() {
        assert!(coords(json!({})).unwrap().is_empty());
        assert!(coords(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn simple_value_lists() {
        let set = coords(json!({
            "time": ["2020-01-01", "2020-01-02", "2020-01-03"],
            "x": [0, 1, 2, 3],
            "pressure": [1000.0, 850.0, 500.0],
        }))
        .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("x").unwrap().values().len(), 4);
        assert!(set.dims().is_empty());
        let names: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["time", "x", "pressure"]);
    }

    #[test]
    fn full_form_with_units_only() {
        let set = coords(json!({"pressure": ["level", [1000, 850, 500], {"units": "hPa"}]})).unwrap();
        assert_eq!(set.dims(), ["level"]);
    }

    #[test]
    fn full_form_with_standard_name_and_units() {
        let set = coords(json!({
            "temperature": [["x"], [273.15, 283.15], {"standard_name": "air_temperature", "units": "K"}],
        }))
        .unwrap();
        assert_eq!(set.dims(), ["x"]);
    }

    #[test]
    fn xarray_dict_form() {
        let set = coords(json!({
            "time": {"dims": ["time"], "data": [0, 1, 2], "attrs": {"units": "s"}},
            "lat": {"dims": ["y", "x"], "data": [[1, 2], [3, 4]]},
        }))
        .unwrap();
        assert_eq!(set.dims(), ["time", "y", "x"]);
    }

    #[test]
    fn standard_name_requires_units() {
        let err = coords(json!({
            "temp": ["temp", [273.15, 283.15], {"standard_name": "air_temperature"}],
        }))
        .unwrap_err();
        assert_eq!(err.attrs_error().map(AttrsError::kind), Some(PolicyKind::Convention));
        assert!(err.to_string().starts_with("coords.temp: units are required when standard_name is specified"));
    }

    #[test]
    fn string_coordinate_is_rejected() {
        let err = coords(json!({"invalid": "this_should_be_a_list_or_tuple"})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCoordinate { ref name, .. } if name == "invalid"));
    }

    #[test]
    fn pair_without_attrs_is_rejected() {
        let err = coords(json!({"invalid": ["x", [1, 2]]})).unwrap_err();
        assert!(err.to_string().starts_with("coords.invalid"));
    }

    #[test]
    fn non_object_coords_are_rejected() {
        let err = coords(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "coords"));
    }
}
