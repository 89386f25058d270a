//! Locating definitions and schemas on disk.
//!
//! Both resource trees are laid out as `<root>/<category>/<file>`, where the
//! category is a domain label such as `pf_active`.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cdl::{CdlParser, ParsedUnit};
use crate::convert::discover_cdl_files;
use crate::domain::Domain;
use crate::error::{CdlSchemaError, Result};
use crate::schema::{schema_id_for_path, SCHEMA_SUFFIX};

/// The two resource trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// CDL definitions.
    Definitions,
    /// Generated JSON schemas.
    Schemas,
}

impl ResourceKind {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Definitions => ".cdl",
            ResourceKind::Schemas => SCHEMA_SUFFIX,
        }
    }
}

/// A resource tree rooted at a directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: ResourceKind,
    root: PathBuf,
}

impl Catalog {
    /// Catalog of CDL definitions under `root`.
    pub fn definitions(root: impl Into<PathBuf>) -> Self {
        Self {
            kind: ResourceKind::Definitions,
            root: root.into(),
        }
    }

    /// Catalog of schemas under `root`.
    pub fn schemas(root: impl Into<PathBuf>) -> Self {
        Self {
            kind: ResourceKind::Schemas,
            root: root.into(),
        }
    }

    /// Resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted category names. Directories starting with `__` are skipped.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut categories = Vec::new();
        for entry in read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with("__") {
                categories.push(name);
            }
        }
        categories.sort();
        Ok(categories)
    }

    /// Sorted file names in `category`, or `category/name` across all
    /// categories when `None`.
    pub fn files(&self, category: Option<&str>) -> Result<Vec<String>> {
        match category {
            Some(category) => self.files_in(category),
            None => {
                let mut all = Vec::new();
                for category in self.categories()? {
                    for name in self.files_in(&category)? {
                        all.push(format!("{}/{}", category, name));
                    }
                }
                Ok(all)
            },
        }
    }

    fn files_in(&self, category: &str) -> Result<Vec<String>> {
        let extension = self.kind.extension();
        let mut files = Vec::new();
        for entry in read_dir(&self.root.join(category))? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_file() && name.ends_with(extension) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Path of `name` in `category`, adding the extension when missing.
    pub fn path_for(&self, category: &str, name: &str) -> PathBuf {
        let extension = self.kind.extension();
        let file_name = if name.ends_with(extension) {
            name.to_string()
        } else {
            format!("{}{}", name, extension)
        };
        self.root.join(category).join(file_name)
    }

    /// Parse a definition.
    pub fn load_definition(&self, category: &str, name: &str) -> Result<ParsedUnit> {
        CdlParser::new().parse_file(&self.path_for(category, name))
    }

    /// Read a schema as JSON.
    pub fn load_schema(&self, category: &str, name: &str) -> Result<Value> {
        let path = self.path_for(category, name);
        let text = fs::read_to_string(&path).map_err(|e| CdlSchemaError::file_read(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn read_dir(path: &Path) -> Result<fs::ReadDir> {
    fs::read_dir(path).map_err(|e| CdlSchemaError::file_read(path, e))
}

/// A definition without a schema at its classified location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSchema {
    /// CDL file.
    pub definition: PathBuf,
    /// Where its schema should be.
    pub expected: PathBuf,
}

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFile {
    /// Offending file.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Result of [`check_coverage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Definitions examined.
    pub definitions: usize,
    /// Schema files examined.
    pub schemas: usize,
    /// Definitions lacking a schema.
    pub missing: Vec<MissingSchema>,
    /// Unparseable definitions and schemas that are not valid JSON.
    pub invalid: Vec<InvalidFile>,
}

impl CoverageReport {
    /// Check if nothing is missing or invalid.
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Check that every definition has a schema and every schema is valid JSON.
pub fn check_coverage(definitions: &Path, schemas: &Path) -> Result<CoverageReport> {
    let mut report = CoverageReport::default();
    let parser = CdlParser::new();

    for definition in discover_cdl_files(definitions)? {
        report.definitions += 1;
        let unit = match parser.parse_file(&definition) {
            Ok(unit) => unit,
            Err(err) => {
                report.invalid.push(InvalidFile {
                    path: definition,
                    message: err.to_string(),
                });
                continue;
            },
        };
        let Some(schema_id) = schema_id_for_path(&definition) else {
            continue;
        };
        let expected = schemas.join(Domain::for_unit(&unit).label()).join(schema_id);
        if !expected.is_file() {
            report.missing.push(MissingSchema {
                definition,
                expected,
            });
        }
    }

    if schemas.is_dir() {
        for entry in WalkDir::new(schemas).sort_by_file_name() {
            let entry = entry?;
            let is_schema = entry.file_name().to_string_lossy().ends_with(SCHEMA_SUFFIX);
            if !entry.file_type().is_file() || !is_schema {
                continue;
            }
            report.schemas += 1;
            let parsed = fs::read_to_string(entry.path())
                .map_err(CdlSchemaError::from)
                .and_then(|text| Ok(serde_json::from_str::<Value>(&text)?));
            if let Err(err) = parsed {
                report.invalid.push(InvalidFile {
                    path: entry.into_path(),
                    message: err.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        definitions = report.definitions,
        schemas = report.schemas,
        missing = report.missing.len(),
        invalid = report.invalid.len(),
        "Coverage checked"
    );
    Ok(report)
}
