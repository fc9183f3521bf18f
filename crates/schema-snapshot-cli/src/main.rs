//! schema-snapshot CLI - detach schema metadata into snapshot files.

use clap::{Parser, Subcommand};
use schema_snapshot::{
    Config, DocumentFormat, FilteredProvider, MetaDocument, Snapshot, SnapshotDocument,
    SnapshotError, SnapshotStats,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "schema-snapshot")]
#[command(about = "Detach database schema metadata into self-contained snapshots")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detach a metadata document into a snapshot file
    Detach {
        /// Metadata document to read (overrides source.path)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Snapshot file to write (overrides output.path); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Snapshot format (overrides output.format)
        #[arg(long, value_parser = ["json", "yaml"])]
        format: Option<String>,
    },

    /// Validate a snapshot file and confirm it detaches to itself
    Check {
        /// Snapshot file (.json, .yaml or .yml)
        path: PathBuf,
    },

    /// Print entity counts of a snapshot file
    Stats {
        /// Snapshot file (.json, .yaml or .yml)
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), SnapshotError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(SnapshotError::Config)?;

    match cli.command {
        Commands::Detach {
            source,
            output,
            format,
        } => {
            let mut config = load_config(cli.config.as_deref(), source)?;

            // Apply overrides
            if let Some(path) = output {
                config.output.path = Some(path);
            }
            if let Some(format) = format {
                config.output.format = Some(parse_format(&format)?);
            }
            config.validate()?;

            detach(&config, cli.output_json)?;
        }

        Commands::Check { path } => {
            let document = SnapshotDocument::load(&path)?;
            info!("Loaded snapshot {} from {:?}", document.fingerprint, path);

            let again = Snapshot::detach(&document.snapshot)?;
            if again != document.snapshot {
                return Err(SnapshotError::InvalidSnapshot(
                    "detaching the snapshot again produced a different graph".into(),
                ));
            }

            if cli.output_json {
                let result = serde_json::json!({
                    "valid": true,
                    "fingerprint": document.fingerprint,
                    "stats": document.stats,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Snapshot is valid");
                println!("  Fingerprint: {}", document.fingerprint);
                println!("  Source: {}", document.source);
                println!("  Created: {}", document.created_at.to_rfc3339());
            }
        }

        Commands::Stats { path } => {
            let document = SnapshotDocument::load(&path)?;
            let stats = document.snapshot.stats();

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Snapshot {}", document.fingerprint);
                print_stats(&stats);
            }
        }
    }

    Ok(())
}

/// Read the configuration file if given, otherwise build one from `--source`.
///
/// The result is not validated yet; overrides are applied first.
fn load_config(path: Option<&Path>, source: Option<PathBuf>) -> Result<Config, SnapshotError> {
    match (path, source) {
        (Some(path), source) => {
            let mut config = Config::read(path)?;
            info!("Loaded configuration from {:?}", path);
            if let Some(source) = source {
                config.source.path = source;
            }
            Ok(config)
        }
        (None, Some(source)) => Ok(Config::for_source(source)),
        (None, None) => Err(SnapshotError::Config(
            "no source given; pass --source or --config".to_string(),
        )),
    }
}

fn parse_format(value: &str) -> Result<DocumentFormat, SnapshotError> {
    match value {
        "json" => Ok(DocumentFormat::Json),
        "yaml" => Ok(DocumentFormat::Yaml),
        other => Err(SnapshotError::Config(format!(
            "unknown format '{}', expected json or yaml",
            other
        ))),
    }
}

fn detach(config: &Config, output_json: bool) -> Result<(), SnapshotError> {
    let metadata = MetaDocument::load(&config.source.path, config.source.format)?;
    info!("Loaded metadata document {:?}", config.source.path);

    let snapshot = if config.filter.is_empty() {
        Snapshot::detach(&metadata)?
    } else {
        Snapshot::detach(FilteredProvider::new(&metadata, config.filter.clone()))?
    };

    let document = SnapshotDocument::new(snapshot, config.source.path.display().to_string())?;
    let format = config.output.resolved_format()?;

    match config.output.path() {
        Some(path) => {
            document.save(path, format, config.output.pretty)?;

            if output_json {
                let result = serde_json::json!({
                    "output": path,
                    "fingerprint": document.fingerprint,
                    "stats": document.stats,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\nSnapshot written to {}", path.display());
                println!("  Fingerprint: {}", document.fingerprint);
                print_stats(&document.stats);
            }
        }
        // The snapshot itself is the output.
        None => println!("{}", document.render(format, config.output.pretty)?),
    }

    Ok(())
}

fn print_stats(stats: &SnapshotStats) {
    println!("  Catalogs: {}", stats.catalogs);
    println!("  Schemas: {}", stats.schemas);
    println!("  Tables: {}", stats.tables);
    println!("  Columns: {}", stats.fields);
    println!("  Indexes: {}", stats.indexes);
    println!(
        "  Unique keys: {} ({} primary)",
        stats.unique_keys, stats.primary_keys
    );
    println!("  Foreign keys: {}", stats.foreign_keys);
    println!("  Checks: {}", stats.checks);
    println!("  Domains: {}", stats.domains);
    println!("  Sequences: {}", stats.sequences);
    println!("  UDTs: {}", stats.udts);
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays parseable.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| format!("failed to initialize logging: {}", e))
}
