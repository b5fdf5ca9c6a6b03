mod config;
mod logging;

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use thiserror::Error;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use config::{ConfigError, DEFAULT_CONFIG_FILE, load_config};
use dataeden_core::{Error as CoreError, Target};
use dataeden_generate::EngineKind;
use dataeden_generate::output::{write_grid, write_grid_csv};
use dataeden_populate::DataEden;

const PASSWORD_ENV: &str = "DATAEDEN_PASSWORD";

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

#[derive(Parser, Debug)]
#[command(name = "dataeden", version, about = "Introspect a table and fill it with synthetic rows")]
struct Cli {
    /// Database address, e.g. jdbc:postgresql://host:5432/db?currentSchema=app.
    #[arg(long, global = true, value_name = "ADDRESS")]
    url: Option<String>,
    /// Database user.
    #[arg(long, global = true, default_value = "")]
    user: String,
    /// Database password (falls back to DATAEDEN_PASSWORD).
    #[arg(long, global = true)]
    password: Option<String>,
    /// Configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the database accepts the credentials.
    Ping,
    /// List base tables of the effective schema.
    Tables,
    /// Describe the columns of a table.
    Columns {
        table: String,
    },
    /// Generate rows for a table and insert them.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    table: String,
    /// Number of rows to generate.
    #[arg(long, default_value_t = 10)]
    rows: usize,
    /// Engine: random or ai.
    #[arg(long, default_value = "random")]
    engine: EngineKind,
    /// Generate without inserting and emit the rows as CSV.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// CSV destination for --dry-run (stdout when omitted).
    #[arg(long, requires = "dry_run")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init_logging(&config.logging).map_err(CliError::Logging)?;

    let target = target_from(&cli)?;
    let eden = DataEden::with_defaults(config.pool.settings(), config.ai.clone());

    let span = info_span!("run", run_id = %Uuid::new_v4());
    let result = run(&eden, &target, cli.command).instrument(span).await;
    eden.shutdown().await;
    result
}

fn target_from(cli: &Cli) -> Result<Target, CliError> {
    let address = cli
        .url
        .clone()
        .ok_or_else(|| CliError::InvalidArgs("--url is required".to_string()))?;
    let password = cli
        .password
        .clone()
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .unwrap_or_default();
    Ok(Target::new(address, cli.user.clone(), password))
}

async fn run(eden: &DataEden, target: &Target, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => {
            let reachable = eden.test_connection(target).await?;
            print_json(&json!({
                "address": target.redacted_address(),
                "reachable": reachable,
            }))
        }
        Command::Tables => print_json(&eden.list_tables(target).await?),
        Command::Columns { table } => print_json(&eden.list_columns(target, &table).await?),
        Command::Generate(args) => run_generate(eden, target, args).await,
    }
}

async fn run_generate(eden: &DataEden, target: &Target, args: GenerateArgs) -> Result<(), CliError> {
    if !args.dry_run {
        let summary = eden
            .generate_and_insert(target, &args.table, args.rows, args.engine)
            .await?;
        return print_json(&summary);
    }

    let preview = eden
        .generate_preview(target, &args.table, args.rows, args.engine)
        .await?;
    match args.out {
        Some(path) => {
            let rows = write_grid_csv(&path, &preview.columns, &preview.grid)?;
            print_json(&json!({
                "table": preview.table,
                "engine": preview.engine,
                "rows_written": rows,
                "out": path,
                "warnings": preview.warnings,
            }))
        }
        None => {
            write_grid(io::stdout().lock(), &preview.columns, &preview.grid)?;
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
