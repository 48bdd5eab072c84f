//! schemakit CLI - Main entry point

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use schemakit_cli::commands::convert::ConvertOptions;
use schemakit_cli::commands::introspect::IntrospectOptions;
use schemakit_cli::commands::{self, RenderOptions};
use schemakit_cli::config::{CONFIG_FILE, Config, Dialect};
use schemakit_cli::error::CliError;
use schemakit_schema::SchemaFormat;
use tracing_subscriber::EnvFilter;

/// schemakit - read, convert and introspect database schemas
#[derive(Parser, Debug)]
#[command(name = "schemakit")]
#[command(author, version, about = "Read, convert and introspect database schemas", long_about = None)]
struct Cli {
    /// Path to config file (default: schemakit.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new schemakit.toml configuration file
    Init {
        /// Database dialect (sqlite, postgres, mysql)
        #[arg(short, long, default_value = "sqlite", value_parser = parse_dialect)]
        dialect: Dialect,
    },

    /// Convert a schema file to another format
    Convert {
        /// Input schema file
        input: PathBuf,

        /// Output format (sql, dsl, models, json)
        #[arg(long, value_parser = parse_format)]
        to: SchemaFormat,

        /// Input format (default: from the file extension)
        #[arg(long, value_parser = parse_format)]
        from: Option<SchemaFormat>,

        /// Dialect for type mapping and quoting (default: config, then detected)
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Package name for generated models (default: config, then "models")
        #[arg(long)]
        package: Option<String>,

        /// Emit CREATE TABLE IF NOT EXISTS
        #[arg(long)]
        if_not_exists: bool,
    },

    /// Parse a schema file and report its tables
    Check {
        /// Schema file to check
        input: PathBuf,

        /// Input format (default: from the file extension)
        #[arg(long, value_parser = parse_format)]
        from: Option<SchemaFormat>,

        /// Dialect of the input (default: config, then detected)
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,
    },

    /// Introspect the configured database
    Introspect {
        /// Output format (sql, dsl, models, json)
        #[arg(short, long, default_value = "sql", value_parser = parse_format)]
        format: SchemaFormat,

        /// Output file (default: <out>/schema.<ext>)
        #[arg(short, long, conflicts_with = "stdout")]
        out: Option<PathBuf>,

        /// Print the schema instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Model file to merge with the catalog (overrides `models` in config)
        #[arg(long)]
        models: Option<PathBuf>,

        /// Keep catalog columns the models do not declare
        #[arg(long)]
        union: bool,

        /// Emit CREATE TABLE IF NOT EXISTS
        #[arg(long)]
        if_not_exists: bool,
    },
}

fn parse_format(s: &str) -> Result<SchemaFormat, String> {
    s.parse().map_err(|e: schemakit_schema::SchemaError| e.to_string())
}

fn parse_dialect(s: &str) -> Result<Dialect, String> {
    Dialect::parse(s).ok_or_else(|| format!("unknown dialect '{s}' (sqlite, postgres, mysql)"))
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Init { dialect } => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
            commands::init::run(dialect, &path)
        }
        Command::Convert {
            input,
            to,
            from,
            dialect,
            out,
            package,
            if_not_exists,
        } => {
            let config = optional_config(cli.config.as_deref())?;
            let package = package
                .or_else(|| config.as_ref().map(|c| c.package.clone()))
                .unwrap_or_else(|| RenderOptions::default().package);
            commands::convert::run(&ConvertOptions {
                input: &input,
                from,
                to,
                dialect: dialect.or(config.as_ref().map(|c| c.dialect)),
                out: out.as_deref(),
                render: RenderOptions {
                    package,
                    if_not_exists,
                },
            })
        }
        Command::Check {
            input,
            from,
            dialect,
        } => {
            let config = optional_config(cli.config.as_deref())?;
            commands::check::run(&input, from, dialect.or(config.map(|c| c.dialect)))
        }
        Command::Introspect {
            format,
            out,
            stdout,
            models,
            union,
            if_not_exists,
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::introspect::run(
                &config,
                &IntrospectOptions {
                    format,
                    out: out.as_deref(),
                    stdout,
                    models: models.as_deref(),
                    union,
                    if_not_exists,
                },
            )
        }
    }
}

/// Load configuration with fallback to default path
fn load_config(custom_path: Option<&Path>) -> Result<Config, CliError> {
    match custom_path {
        Some(path) => Config::load_from(path).map_err(Into::into),
        None => Config::load().map_err(Into::into),
    }
}

/// Like [`load_config`], but a missing default file is not an error
fn optional_config(custom_path: Option<&Path>) -> Result<Option<Config>, CliError> {
    if custom_path.is_none() && !Path::new(CONFIG_FILE).exists() {
        return Ok(None);
    }
    load_config(custom_path).map(Some)
}
