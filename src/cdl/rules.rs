//! Named patterns for the CDL subset used by definition files.
//!
//! Every pattern is matched against a single trimmed statement (the text
//! between two `;` separators), never against the raw file.

use regex::Regex;
use std::sync::LazyLock;

/// `netcdf <name> {` opening the file.
pub(crate) static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*netcdf\s+[^\s{]+\s*\{").expect("valid header pattern"));

/// `:<name> = "<value>"`
pub(crate) static GLOBAL_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^:(\w+)\s*=\s*"([^"]*)""#).expect("valid global attribute pattern")
});

/// `<name> = <size>` inside `dimensions:`.
pub(crate) static DIMENSION_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*=\s*(\S+)$").expect("valid dimension pattern"));

/// `<type> <name>` with an optional `(<dim>, ...)` list.
pub(crate) static VARIABLE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(\w+)\s*(?:\(([^()]*)\))?$").expect("valid declaration pattern")
});

/// `<variable>:<attribute> =` prefix shared by both attribute forms.
pub(crate) static ATTRIBUTE_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*:\s*(\w+)\s*=").expect("valid attribute pattern"));

/// `<variable>:<attribute> = "<string>"`
pub(crate) static STRING_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\w+)\s*:\s*(\w+)\s*=\s*"([^"]*)""#).expect("valid string attribute pattern")
});

/// `<variable>:<attribute> = <value>`
pub(crate) static VALUE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\w+)\s*:\s*(\w+)\s*=\s*(.+)$").expect("valid value attribute pattern")
});
