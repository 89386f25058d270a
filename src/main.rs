//! cdl-schema - convert CDL definitions and validate dataset metadata.

use anyhow::Result;
use cdl_schema::catalog::{check_coverage, Catalog};
use cdl_schema::convert::{discover_cdl_files, ConvertOptions, Converter, Outcome};
use cdl_schema::schema::DEFAULT_BASE_URL;
use cdl_schema::units::UnitRegistry;
use cdl_schema::validate::validate_file;
use cdl_schema::CdlSchemaError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "cdl-schema", version)]
#[command(about = "Convert NetCDF CDL definitions to JSON Schema", long_about = None)]
struct Args {
    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CDL file, or every CDL file under a directory
    Convert {
        /// CDL file or directory containing CDL files
        input: PathBuf,

        /// Output directory for generated schemas
        output: PathBuf,

        /// Base URL for schema IDs
        #[arg(long, env = "CDL_SCHEMA_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Overwrite existing schema files
        #[arg(long)]
        force: bool,

        /// Fail on malformed declarations instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Validate a dataset, data array, coordinate set or attribute pair given as JSON
    Validate {
        /// JSON file to validate
        file: PathBuf,
    },

    /// Check that every definition has a schema and every schema is valid JSON
    Check {
        /// Definitions root
        definitions: PathBuf,

        /// Schemas root
        schemas: PathBuf,
    },

    /// List definitions or schemas
    List {
        /// Resource root
        root: PathBuf,

        /// Only list this category
        #[arg(long)]
        category: Option<String>,

        /// Treat the root as a schema tree
        #[arg(long)]
        schemas: bool,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Log to a file when --log is given, otherwise to stderr via RUST_LOG
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    tracing::info!("Starting cdl-schema");

    let code = match args.command {
        Command::Convert {
            input,
            output,
            base_url,
            force,
            strict,
        } => convert(
            input,
            ConvertOptions {
                output_dir: output,
                base_url,
                force,
                strict,
            },
        )?,
        Command::Validate { file } => validate(file)?,
        Command::Check {
            definitions,
            schemas,
        } => check(definitions, schemas)?,
        Command::List {
            root,
            category,
            schemas,
        } => {
            let catalog = if schemas {
                Catalog::schemas(root)
            } else {
                Catalog::definitions(root)
            };
            for name in catalog.files(category.as_deref())? {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        },
    };

    tracing::info!("cdl-schema exited");
    Ok(code)
}

fn convert(input: PathBuf, options: ConvertOptions) -> Result<ExitCode> {
    let files = discover_cdl_files(&input)?;
    if files.is_empty() {
        return Err(CdlSchemaError::NoInputFiles { path: input }.into());
    }

    std::fs::create_dir_all(&options.output_dir)?;
    let converter = Converter::new(options);
    let summary = converter.convert_all(&files, |path, result| {
        println!("Processing: {}", path.display());
        match result {
            Ok(Outcome::Generated(output)) => println!("  Generated: {}", output.display()),
            Ok(Outcome::Skipped(output)) => println!(
                "  Skipping {} (already exists, use --force to overwrite)",
                output.display()
            ),
            Err(err) => println!("  Error processing {}: {}", path.display(), err),
        }
    });

    println!("{}", summary);
    Ok(ExitCode::SUCCESS)
}

fn validate(file: PathBuf) -> Result<ExitCode> {
    match validate_file(&file, UnitRegistry::shared()) {
        Ok(shape) => {
            println!("valid {}", shape);
            Ok(ExitCode::SUCCESS)
        },
        Err(CdlSchemaError::Validation(err)) => {
            eprintln!("invalid: {}", err);
            Ok(ExitCode::FAILURE)
        },
        Err(err) => Err(err.into()),
    }
}

fn check(definitions: PathBuf, schemas: PathBuf) -> Result<ExitCode> {
    let report = check_coverage(&definitions, &schemas)?;

    for missing in &report.missing {
        println!(
            "Missing schema: {} -> {}",
            missing.definition.display(),
            missing.expected.display()
        );
    }
    for invalid in &report.invalid {
        println!("Invalid: {}: {}", invalid.path.display(), invalid.message);
    }
    println!(
        "Checked {} definition(s) and {} schema(s): {} missing, {} invalid",
        report.definitions,
        report.schemas,
        report.missing.len(),
        report.invalid.len()
    );

    Ok(if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
