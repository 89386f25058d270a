//! Parsed CDL structures.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CdlSchemaError, Result};

/// A declared dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Declared size, `None` for `UNLIMITED` or placeholder dimensions.
    pub size: Option<u64>,
}

impl Dimension {
    /// Create a new dimension.
    pub fn new(name: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Check if this dimension has no fixed size.
    pub fn is_unlimited(&self) -> bool {
        self.size.is_none()
    }
}

/// Value of a variable attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Integer literal.
    Int(i64),
    /// Floating point literal (contained a `.`).
    Float(f64),
    /// Quoted string, or an unquoted literal that is not a number.
    Text(String),
}

impl AttributeValue {
    /// Coerce an unquoted literal: float if it contains `.`, integer
    /// otherwise, raw text when neither parses.
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        let parsed = if raw.contains('.') {
            raw.parse::<f64>().ok().map(Self::Float)
        } else {
            raw.parse::<i64>().ok().map(Self::Int)
        };
        parsed.unwrap_or_else(|| Self::Text(raw.to_string()))
    }

    /// Borrow the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this value is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A declared variable with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// CDL type token (`double`, `int`, `string`, ...).
    pub data_type: String,
    /// Dimension names in declaration (axis) order.
    pub dimensions: Vec<String>,
    /// Variable attributes.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Variable {
    /// Create a new variable without attributes.
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        dimensions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            dimensions,
            attributes: BTreeMap::new(),
        }
    }

    /// Get an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Check if an attribute is present.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    /// Check if this variable has no dimensions.
    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Everything extracted from one CDL source.
///
/// Dimensions and variables keep their first-declaration order. Declaring
/// the same name twice replaces the earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedUnit {
    /// Global string attributes.
    pub global_attributes: BTreeMap<String, String>,
    /// Declared dimensions.
    pub dimensions: Vec<Dimension>,
    /// Declared variables.
    pub variables: Vec<Variable>,
    /// Path or label of the source text.
    pub source_file: String,
}

impl ParsedUnit {
    /// Create an empty unit for the given source.
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Self::default()
        }
    }

    /// Get a global attribute.
    pub fn global_attribute(&self, key: &str) -> Option<&str> {
        self.global_attributes.get(key).map(String::as_str)
    }

    /// Set a global attribute (last write wins).
    pub fn set_global_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.global_attributes.insert(key.into(), value.into());
    }

    /// Look up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Insert a dimension, replacing one with the same name.
    pub fn insert_dimension(&mut self, dimension: Dimension) {
        match self.dimensions.iter_mut().find(|d| d.name == dimension.name) {
            Some(existing) => *existing = dimension,
            None => self.dimensions.push(dimension),
        }
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Insert a variable, replacing one with the same name.
    pub fn insert_variable(&mut self, variable: Variable) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
    }

    /// Iterate over variable names in declaration order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    /// Ensure every dimension a variable references is declared.
    pub fn check_dimension_references(&self) -> Result<()> {
        for var in &self.variables {
            if let Some(missing) = var
                .dimensions
                .iter()
                .find(|dim| self.dimension(dim).is_none())
            {
                return Err(CdlSchemaError::dangling_dimension(&var.name, missing));
            }
        }
        Ok(())
    }
}
