//! Validation failures.

use thiserror::Error;

use crate::units::UnitError;
use crate::validate::attrs::SPECIAL_UNITS_HINT;

/// Which rule an [`AttrsError`] violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// The input is not usable at all (blank name).
    Malformed,
    /// `standard_name` breaks the naming rule.
    Naming,
    /// `units` is unknown or not in canonical form.
    Units,
    /// `standard_name` given without `units`.
    Convention,
}

/// Failures of the `standard_name` / `units` rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrsError {
    /// `standard_name` is present but blank.
    #[error("standard_name must be a non-empty string")]
    EmptyStandardName,

    /// `standard_name` is not lowercase, does not start with a letter or
    /// contains whitespace.
    #[error(
        "The proposed Standard Name **{name}** is *not* valid.\n\n\
         Standard names must:\n\
         - be lowercase;\n\
         - start with a letter;\n\
         - and not contain whitespace."
    )]
    InvalidStandardName {
        /// Rejected name.
        name: String,
    },

    /// `units` does not resolve in the unit registry.
    #[error("{source}")]
    UndefinedUnit {
        /// Rejected units string.
        units: String,
        /// Registry failure.
        #[source]
        source: UnitError,
    },

    /// `units` resolves, but not to the tokens that were written.
    #[error(
        "units '{units}' must be a valid standard unit such as {canonical} \
         following UDUNITS conventions or one of: {}",
        SPECIAL_UNITS_HINT
    )]
    UnitFormat {
        /// Supplied units string.
        units: String,
        /// Canonical spelling of the same unit.
        canonical: String,
    },

    /// `standard_name` is present but `units` is not.
    #[error("units are required when standard_name is specified (Fusion convention)")]
    MissingUnits {
        /// The standard name lacking units.
        standard_name: String,
    },
}

impl AttrsError {
    /// Rule violated by this failure.
    pub fn kind(&self) -> PolicyKind {
        match self {
            AttrsError::EmptyStandardName => PolicyKind::Malformed,
            AttrsError::InvalidStandardName { .. } => PolicyKind::Naming,
            AttrsError::UndefinedUnit { .. } | AttrsError::UnitFormat { .. } => PolicyKind::Units,
            AttrsError::MissingUnits { .. } => PolicyKind::Convention,
        }
    }
}

/// Failures of the structural models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The `standard_name` / `units` rule failed.
    #[error(transparent)]
    Attrs(#[from] AttrsError),

    /// A required field is absent.
    #[error("{field}: Field required")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// A field has the wrong JSON type.
    #[error("{field}: {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// What was expected.
        reason: String,
    },

    /// A dimension name is blank or not a string.
    #[error("All dimension names must be non-empty strings")]
    InvalidDimensionName,

    /// A dataset dimension size is not a non-negative integer.
    #[error("Dimension '{name}' size must be a non-negative integer")]
    InvalidDimensionSize {
        /// Dimension name.
        name: String,
    },

    /// A coordinate is neither a value list nor a `(dims, values, attrs)` triple.
    #[error("coords.{name}: Invalid coordinate definition for '{name}': {definition}")]
    InvalidCoordinate {
        /// Coordinate name.
        name: String,
        /// The rejected JSON, compact.
        definition: String,
    },

    /// The value is not a dataset, data array, coordinate set or attribute pair.
    #[error("Unsupported structure: expected a dataset, data array, coordinate set or standard attributes")]
    UnsupportedShape,

    /// A failure inside a named member (`coords.<name>`, `data_vars.<name>`).
    #[error("{path}: {source}")]
    Nested {
        /// Dotted location of the member.
        path: String,
        /// Failure inside it.
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn nested(path: String, source: ValidationError) -> Self {
        Self::Nested {
            path,
            source: Box::new(source),
        }
    }

    /// The attribute-rule failure underneath any nesting, if that is the cause.
    pub fn attrs_error(&self) -> Option<&AttrsError> {
        match self {
            ValidationError::Attrs(err) => Some(err),
            ValidationError::Nested { source, .. } => source.attrs_error(),
            _ => None,
        }
    }
}
