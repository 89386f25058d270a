//! Error types for cdl-schema.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! Validation failures have their own enum in [`crate::validate`] and are
//! wrapped here when they cross the library boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationError;

/// Result type alias for cdl-schema operations.
pub type Result<T> = std::result::Result<T, CdlSchemaError>;

/// Errors that can occur while parsing, generating or converting.
#[derive(Debug, Error)]
pub enum CdlSchemaError {
    /// Failed to read or decode a source file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A variable declaration did not match the CDL grammar (strict mode only).
    #[error("Malformed variable declaration at line {line}: {statement}")]
    MalformedDeclaration {
        /// 1-based line number of the statement.
        line: usize,
        /// Offending statement text.
        statement: String,
    },

    /// A dimension entry did not match `<name> = <size>` (strict mode only).
    #[error("Malformed dimension entry at line {line}: {entry}")]
    MalformedDimension {
        /// 1-based line number of the entry.
        line: usize,
        /// Offending entry text.
        entry: String,
    },

    /// A variable references a dimension that is not declared.
    #[error("Variable '{variable}' references undeclared dimension '{dimension}'")]
    DanglingDimension {
        /// Variable holding the reference.
        variable: String,
        /// Missing dimension name.
        dimension: String,
    },

    /// Input path is neither a file nor a directory.
    #[error("{} is not a valid file or directory", path.display())]
    InvalidInput {
        /// Offending path.
        path: PathBuf,
    },

    /// No CDL files were found under the input path.
    #[error("No CDL files found in {}", path.display())]
    NoInputFiles {
        /// Searched path.
        path: PathBuf,
    },

    /// Dataset metadata failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CdlSchemaError {
    /// Create a FileRead error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a DanglingDimension error.
    pub fn dangling_dimension(variable: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::DanglingDimension {
            variable: variable.into(),
            dimension: dimension.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(path: impl Into<PathBuf>) -> Self {
        Self::InvalidInput { path: path.into() }
    }
}

impl From<walkdir::Error> for CdlSchemaError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => Self::FileRead { path, source },
            None => Self::InvalidInput { path },
        }
    }
}

impl From<tempfile::PersistError> for CdlSchemaError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
