//! CDL text parser.

use std::path::Path;

use super::rules::{
    ATTRIBUTE_TARGET, DIMENSION_ENTRY, GLOBAL_ATTRIBUTE, HEADER, STRING_ATTRIBUTE,
    VALUE_ATTRIBUTE, VARIABLE_DECLARATION,
};
use super::scanner::{self, Statement};
use super::{AttributeValue, Dimension, ParsedUnit, Variable};
use crate::error::{CdlSchemaError, Result};

const DIMENSIONS_MARKER: &str = "dimensions:";
const VARIABLES_MARKER: &str = "variables:";
const DATA_MARKER: &str = "data:";

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on malformed declarations, malformed dimension entries and
    /// dangling dimension references instead of skipping them.
    pub strict: bool,
}

/// Byte ranges of the sections of a comment-free CDL text.
#[derive(Debug, Clone, Copy)]
struct Sections {
    header: (usize, usize),
    dimensions: Option<(usize, usize)>,
    variables: Option<(usize, usize)>,
}

impl Sections {
    fn locate(text: &str) -> Self {
        let body_start = HEADER.find(text).map_or(0, |m| m.end());
        let body_end = scanner::closing_brace(text).unwrap_or(text.len());

        let dims = scanner::find_marker(text, DIMENSIONS_MARKER, body_start);
        let vars_from = dims.map_or(body_start, |d| d + DIMENSIONS_MARKER.len());
        let vars = scanner::find_marker(text, VARIABLES_MARKER, vars_from);
        let data_from = vars.map_or(vars_from, |v| v + VARIABLES_MARKER.len());
        let data = scanner::find_marker(text, DATA_MARKER, data_from);

        let header_end = dims.or(vars).or(data).unwrap_or(body_end).min(body_end);
        let dimensions = dims.map(|d| {
            let start = d + DIMENSIONS_MARKER.len();
            (start, vars.or(data).unwrap_or(body_end).max(start))
        });
        let variables = vars.map(|v| {
            let start = v + VARIABLES_MARKER.len();
            (start, data.unwrap_or(body_end).max(start))
        });

        Self {
            header: (body_start, header_end.max(body_start)),
            dimensions,
            variables,
        }
    }
}

/// CDL parser for definition files.
#[derive(Debug, Clone, Default)]
pub struct CdlParser {
    options: ParseOptions,
}

impl CdlParser {
    /// Create a permissive parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with explicit options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Create a parser that fails on anything it would otherwise skip.
    pub fn strict() -> Self {
        Self::with_options(ParseOptions { strict: true })
    }

    /// Options in effect.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Read and parse a CDL file.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedUnit> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CdlSchemaError::file_read(path, e))?;
        self.parse_str(&content, path.display().to_string())
    }

    /// Parse CDL text. `source_file` is recorded in the result for provenance.
    pub fn parse_str(&self, content: &str, source_file: impl Into<String>) -> Result<ParsedUnit> {
        let text = scanner::strip_comments(content);
        let sections = Sections::locate(&text);
        let mut unit = ParsedUnit::new(source_file);

        let (start, end) = sections.header;
        for stmt in scanner::statements(&text, start, end, &[';']) {
            Self::parse_global_attribute(stmt.text, &mut unit);
        }

        if let Some((start, end)) = sections.dimensions {
            self.parse_dimensions(&text, start, end, &mut unit)?;
        }

        if let Some((start, end)) = sections.variables {
            self.parse_variables(&text, start, end, &mut unit)?;
        }

        if self.options.strict {
            unit.check_dimension_references()?;
        }

        tracing::debug!(
            source = %unit.source_file,
            dimensions = unit.dimensions.len(),
            variables = unit.variables.len(),
            "Parsed CDL"
        );

        Ok(unit)
    }

    fn parse_global_attribute(statement: &str, unit: &mut ParsedUnit) -> bool {
        match GLOBAL_ATTRIBUTE.captures(statement) {
            Some(caps) => {
                unit.set_global_attribute(&caps[1], &caps[2]);
                true
            },
            None => false,
        }
    }

    fn parse_dimensions(
        &self,
        text: &str,
        start: usize,
        end: usize,
        unit: &mut ParsedUnit,
    ) -> Result<()> {
        for entry in scanner::statements(text, start, end, &[';', ',']) {
            match DIMENSION_ENTRY.captures(entry.text) {
                Some(caps) => {
                    // UNLIMITED, `_` and any other non-numeric token
                    let size = caps[2].parse::<u64>().ok();
                    unit.insert_dimension(Dimension::new(&caps[1], size));
                },
                None if self.options.strict => {
                    return Err(CdlSchemaError::MalformedDimension {
                        line: scanner::line_at(text, entry.offset),
                        entry: entry.text.to_string(),
                    });
                },
                None => {
                    tracing::info!(entry = entry.text, "Skipping malformed dimension entry");
                },
            }
        }
        Ok(())
    }

    fn parse_variables(
        &self,
        text: &str,
        start: usize,
        end: usize,
        unit: &mut ParsedUnit,
    ) -> Result<()> {
        let mut current: Option<Variable> = None;

        for stmt in scanner::statements(text, start, end, &[';']) {
            if Self::parse_global_attribute(stmt.text, unit) {
                continue;
            }

            if let Some(caps) = ATTRIBUTE_TARGET.captures(stmt.text) {
                match current.as_mut() {
                    Some(var) if var.name == caps[1] => Self::apply_attribute(stmt.text, var),
                    _ => tracing::debug!(
                        statement = stmt.text,
                        "Ignoring attribute outside its variable's block"
                    ),
                }
                continue;
            }

            if let Some(var) = current.take() {
                unit.insert_variable(var);
            }
            current = self.parse_declaration(text, stmt)?;
        }

        if let Some(var) = current {
            unit.insert_variable(var);
        }

        Ok(())
    }

    fn parse_declaration(&self, text: &str, stmt: Statement<'_>) -> Result<Option<Variable>> {
        let Some(caps) = VARIABLE_DECLARATION.captures(stmt.text) else {
            let line = scanner::line_at(text, stmt.offset);
            if self.options.strict {
                return Err(CdlSchemaError::MalformedDeclaration {
                    line,
                    statement: stmt.text.to_string(),
                });
            }
            tracing::info!(line, statement = stmt.text, "Skipping unrecognised variable declaration");
            return Ok(None);
        };

        let dimensions = caps
            .get(3)
            .map(|dims| {
                dims.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(Variable::new(&caps[2], &caps[1], dimensions)))
    }

    fn apply_attribute(statement: &str, var: &mut Variable) {
        if let Some(caps) = STRING_ATTRIBUTE.captures(statement) {
            var.set_attribute(&caps[2], AttributeValue::Text(caps[3].to_string()));
        } else if let Some(caps) = VALUE_ATTRIBUTE.captures(statement) {
            var.set_attribute(&caps[2], AttributeValue::coerce(&caps[3]));
        }
    }
}
