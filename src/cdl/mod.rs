//! CDL parsing and representation.
//!
//! This module scans the subset of NetCDF CDL used by definition files
//! (global attributes, dimensions, variables and variable attributes) into
//! a [`ParsedUnit`].

mod model;
mod parser;
mod rules;
mod scanner;

pub use model::{AttributeValue, Dimension, ParsedUnit, Variable};
pub use parser::{CdlParser, ParseOptions};
