//! The `standard_name` / `units` rule.
//!
//! Every structural model funnels its attributes through
//! [`StandardAttrs::validate`], so the naming, unit and coupling checks live
//! only here.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::units::UnitRegistry;
use crate::validate::error::{AttrsError, ValidationError};

/// Units accepted without a registry lookup (compared case-insensitively).
pub const SPECIAL_UNITS: [&str; 4] = ["1", "none", "", "undefined"];

pub(crate) const SPECIAL_UNITS_HINT: &str = "1, none, \"\", undefined";

/// Optional `standard_name` and `units` of a coordinate or variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardAttrs {
    /// CF-style standard name.
    pub standard_name: Option<String>,
    /// UDUNITS-style units string.
    pub units: Option<String>,
}

impl StandardAttrs {
    /// Create from optional values.
    pub fn new(standard_name: Option<&str>, units: Option<&str>) -> Self {
        Self {
            standard_name: standard_name.map(str::to_string),
            units: units.map(str::to_string),
        }
    }

    /// Pick `standard_name` and `units` out of an attribute map.
    ///
    /// `null` counts as absent; any other non-string value is rejected.
    pub fn from_attrs(attrs: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            standard_name: optional_string(attrs, "standard_name")?,
            units: optional_string(attrs, "units")?,
        })
    }

    /// Check the naming rule, then units, then the coupling between the two.
    pub fn validate(&self, registry: &UnitRegistry) -> Result<(), AttrsError> {
        if let Some(name) = &self.standard_name {
            check_standard_name(name)?;
        }
        if let Some(units) = &self.units {
            check_units(units, registry)?;
        }
        match (&self.standard_name, &self.units) {
            (Some(standard_name), None) => Err(AttrsError::MissingUnits {
                standard_name: standard_name.clone(),
            }),
            _ => Ok(()),
        }
    }
}

fn optional_string(attrs: &Map<String, Value>, key: &str) -> Result<Option<String>, ValidationError> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid(key, "Input should be a valid string")),
    }
}

fn check_standard_name(name: &str) -> Result<(), AttrsError> {
    if name.trim().is_empty() {
        return Err(AttrsError::EmptyStandardName);
    }

    let starts_with_letter = name.chars().next().is_some_and(char::is_alphabetic);
    let well_formed =
        starts_with_letter && !name.chars().any(|c| c.is_uppercase() || c.is_whitespace());
    if !well_formed {
        return Err(AttrsError::InvalidStandardName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_units(units: &str, registry: &UnitRegistry) -> Result<(), AttrsError> {
    let lowered = units.to_lowercase();
    if SPECIAL_UNITS.contains(&lowered.as_str()) {
        return Ok(());
    }

    let canonical = registry
        .resolve(units)
        .map_err(|source| AttrsError::UndefinedUnit {
            units: units.to_string(),
            source,
        })?;

    let tokens = canonical.tokens();
    let expected: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
    let supplied: BTreeSet<&str> = units.split('.').collect();
    if supplied != expected {
        return Err(AttrsError::UnitFormat {
            units: units.to_string(),
            canonical: canonical.to_string(),
        });
    }
    Ok(())
}
