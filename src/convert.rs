//! Batch conversion of CDL definitions into schema files.
//!
//! One CDL file produces one schema under `<output>/<domain>/<schema id>`.
//! A failing file is recorded and the batch moves on.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::cdl::{CdlParser, ParseOptions};
use crate::error::{CdlSchemaError, Result};
use crate::schema::{schema_id_for_path, SchemaGenerator, DEFAULT_BASE_URL};

/// Extension of CDL definition files.
pub const CDL_EXTENSION: &str = "cdl";

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Root directory for generated schemas.
    pub output_dir: PathBuf,
    /// Base URL for `$id` values.
    pub base_url: String,
    /// Overwrite schemas that already exist.
    pub force: bool,
    /// Parse in strict mode.
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("schemas"),
            base_url: DEFAULT_BASE_URL.to_string(),
            force: false,
            strict: false,
        }
    }
}

impl ConvertOptions {
    /// Default options writing to `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Collect the CDL files under `input`.
///
/// A file is returned as-is, whatever its extension. A directory is walked
/// recursively for `*.cdl`; the result is sorted.
pub fn discover_cdl_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(CdlSchemaError::invalid_input(input));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry?;
        let is_cdl = entry.path().extension().is_some_and(|ext| ext == CDL_EXTENSION);
        if entry.file_type().is_file() && is_cdl {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A schema was written to this path.
    Generated(PathBuf),
    /// A schema already existed at this path and `force` was off.
    Skipped(PathBuf),
}

/// A file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Input file.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Totals of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Written schema paths.
    pub generated: Vec<PathBuf>,
    /// Existing schema paths left alone.
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed.
    pub failed: Vec<Failure>,
}

impl ConversionSummary {
    /// Number of processed inputs.
    pub fn total(&self) -> usize {
        self.generated.len() + self.skipped.len() + self.failed.len()
    }

    /// Check if no input failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, input: &Path, result: &Result<Outcome>) {
        match result {
            Ok(Outcome::Generated(path)) => self.generated.push(path.clone()),
            Ok(Outcome::Skipped(path)) => self.skipped.push(path.clone()),
            Err(err) => self.failed.push(Failure {
                path: input.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} file(s): {} generated, {} skipped, {} failed",
            self.total(),
            self.generated.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Parses, generates and writes schemas.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    parser: CdlParser,
    generator: SchemaGenerator,
}

impl Converter {
    /// Create a converter for the given options.
    pub fn new(options: ConvertOptions) -> Self {
        let parser = CdlParser::with_options(ParseOptions {
            strict: options.strict,
        });
        let generator = SchemaGenerator::new(options.base_url.clone());
        Self {
            options,
            parser,
            generator,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one CDL file.
    pub fn convert_file(&self, path: &Path) -> Result<Outcome> {
        let unit = self.parser.parse_file(path)?;
        let schema_id =
            schema_id_for_path(path).ok_or_else(|| CdlSchemaError::invalid_input(path))?;
        let document = self.generator.generate(&unit, &schema_id)?;
        let output = document.output_path(&self.options.output_dir);

        if output.exists() && !self.options.force {
            tracing::info!(output = %output.display(), "Schema exists, skipping");
            return Ok(Outcome::Skipped(output));
        }

        write_atomic(&output, &document.to_json_pretty()?)?;
        tracing::info!(input = %path.display(), output = %output.display(), "Generated schema");
        Ok(Outcome::Generated(output))
    }

    /// Convert every file, continuing past failures.
    ///
    /// `report` sees each input together with its result as soon as it is
    /// known.
    pub fn convert_all<F>(&self, files: &[PathBuf], mut report: F) -> ConversionSummary
    where
        F: FnMut(&Path, &Result<Outcome>),
    {
        let mut summary = ConversionSummary::default();
        for path in files {
            let result = self.convert_file(path);
            if let Err(err) = &result {
                tracing::error!(input = %path.display(), "Conversion failed: {}", err);
            }
            report(path, &result);
            summary.record(path, &result);
        }
        summary
    }
}

/// Write `contents` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path)?;
    Ok(())
}
