//! cdl-schema - NetCDF CDL definitions to JSON Schema.
//!
//! The crate reads the text form of NetCDF headers (CDL), turns each
//! definition into a draft-07 JSON Schema routed by subject domain, and
//! checks dataset metadata against standard-name and unit conventions.
//!
//! # Features
//!
//! - Quote-aware CDL parsing, single-line or multi-line
//! - Deterministic schema generation with provenance
//! - Domain classification from variable-name prefixes
//! - `standard_name` / `units` validation backed by a built-in unit registry
//! - Batch conversion with atomic writes and a coverage check
//!
//! # Example
//!
//! ```
//! use cdl_schema::cdl::CdlParser;
//! use cdl_schema::schema::SchemaGenerator;
//!
//! let cdl = r#"netcdf coil { dimensions: time = 4 ; variables: double pf_current(time) ; pf_current:units = "A" ; }"#;
//! let unit = CdlParser::new().parse_str(cdl, "coil.cdl")?;
//! let schema = SchemaGenerator::default().generate(&unit, "coil.schema.json")?;
//!
//! assert_eq!(schema.domain.label(), "pf_active");
//! assert_eq!(
//!     schema.body["$id"],
//!     "https://schemas.standard-interfaces.org/pf_active/coil.schema.json"
//! );
//! # Ok::<(), cdl_schema::CdlSchemaError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cdl;
pub mod convert;
pub mod domain;
pub mod error;
pub mod schema;
pub mod units;
pub mod validate;

pub use error::{CdlSchemaError, Result};
