mod logging;
mod output;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use fieldguard_core::{ConfigError, SCHEMA_FORMAT_VERSION, SchemaDocument};
use fieldguard_sync::{EnvError, SyncClient, SyncError};
use fieldguard_validate::{
    DocumentError, check_document, document_json_schema, load_document, validate,
    validate_collect,
};
use thiserror::Error;
use uuid::Uuid;

use logging::init_logging;
use output::{read_json, write_json_atomic};
use settings::{SyncOverrides, load_settings, resolve_sync_config};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid schema document: {0}")]
    Document(#[from] DocumentError),
    #[error("inconsistent schema: {0}")]
    Schema(#[from] ConfigError),
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
    #[error("sync configuration error: {0}")]
    Env(#[from] EnvError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Parser, Debug)]
#[command(name = "fieldguard", version, about = "Fieldguard schema checker, validator and sync CLI")]
struct Cli {
    /// Append JSON log lines to this file instead of logging to stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Settings file (defaults to ./fieldguard.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a schema document is well-formed and consistent.
    Check(CheckArgs),
    /// Validate a JSON record against a schema document.
    Validate(ValidateArgs),
    /// Push a schema document to the project's interfaces endpoint.
    Sync(SyncArgs),
    /// Print the JSON Schema of the schema document format.
    EmitSchema(EmitSchemaArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Check(_) => "check",
            Command::Validate(_) => "validate",
            Command::Sync(_) => "sync",
            Command::EmitSchema(_) => "emit-schema",
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Schema document (JSON).
    schema: PathBuf,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Schema document (JSON).
    schema: PathBuf,
    /// Record to validate (JSON object).
    record: PathBuf,
    /// Report every violation as JSON instead of stopping at the first.
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Schema document (JSON).
    schema: PathBuf,
    /// Project to push to; overrides FIELDGUARD_PROJECT_ID and the settings file.
    #[arg(long)]
    project_id: Option<String>,
    /// API base URL; overrides FIELDGUARD_API_DOMAIN and the settings file.
    #[arg(long)]
    api_domain: Option<String>,
}

#[derive(Args, Debug)]
struct EmitSchemaArgs {
    /// Write to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_file.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let run_id = Uuid::new_v4().to_string();
    let command = cli.command.name();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command,
        format_version = SCHEMA_FORMAT_VERSION
    );
    let timer = Instant::now();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Validate(args) => run_validate(args),
        Command::Sync(args) => run_sync(args, cli.config.as_deref()).await,
        Command::EmitSchema(args) => run_emit_schema(args),
    };

    let duration_ms = timer.elapsed().as_millis();
    match result {
        Ok(true) => {
            tracing::info!(event = "run_finished", run_id = %run_id, status = "success", duration_ms);
            ExitCode::SUCCESS
        }
        Ok(false) => {
            tracing::info!(event = "run_finished", run_id = %run_id, status = "failed", duration_ms);
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(event = "run_finished", run_id = %run_id, status = "error", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_checked_document(path: &Path) -> Result<SchemaDocument, CliError> {
    let document = load_document(&read_json(path)?)?;
    check_document(&document)?;
    Ok(document)
}

fn run_check(args: CheckArgs) -> Result<bool, CliError> {
    let raw = read_json(&args.schema)?;
    let document = match load_document(&raw) {
        Ok(document) => document,
        Err(DocumentError::Structure(report)) => {
            for issue in &report.issues {
                eprintln!("error {} {}: {}", issue.code, issue.path, issue.message);
            }
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    if let Err(err) = check_document(&document) {
        eprintln!("error {err}");
        return Ok(false);
    }

    println!(
        "schema '{}' is consistent ({} fields)",
        document.key,
        document.fields.len()
    );
    Ok(true)
}

fn run_validate(args: ValidateArgs) -> Result<bool, CliError> {
    let document = load_checked_document(&args.schema)?;
    let record = read_json(&args.record)?;

    if args.all {
        let outcome = validate_collect(&record, &document.fields);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        tracing::info!(
            event = "record_checked",
            key = %document.key,
            did_fail = outcome.did_fail,
            failures = outcome.len()
        );
        return Ok(outcome.is_ok());
    }

    match validate(&record, &document.fields) {
        Ok(()) => {
            println!("record is valid against '{}'", document.key);
            Ok(true)
        }
        Err(err) => {
            eprintln!("error {}: {}", err.path, err.message);
            Ok(false)
        }
    }
}

async fn run_sync(args: SyncArgs, config_path: Option<&Path>) -> Result<bool, CliError> {
    let settings = load_settings(config_path)?;
    let overrides = SyncOverrides {
        api_domain: args.api_domain,
        project_id: args.project_id,
    };
    let config = resolve_sync_config(&settings.sync, &overrides, |name| std::env::var(name).ok())?;
    let document = load_document(&read_json(&args.schema)?)?;

    let client = SyncClient::new(config)?;
    let report = client.push(&document).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.outcome.is_accepted())
}

fn run_emit_schema(args: EmitSchemaArgs) -> Result<bool, CliError> {
    let schema = document_json_schema();
    match args.out {
        Some(path) => {
            write_json_atomic(&path, &schema)?;
            tracing::info!(event = "schema_written", path = %path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(true)
}
