//! pollme command-line schema reader.
//!
//! Prints the reflected model schema of the installed apps.

mod formatter;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use pollme_core::reader::{ModelReader, ReaderConfig};
use pollme_polls::installed_apps;
use tracing::debug;

/// pollme command-line schema reader
#[derive(Parser, Debug)]
#[command(name = "pollme")]
#[command(version, about = "Inspect the pollme model schema")]
pub struct Args {
    /// Output format
    #[arg(long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    /// Apps to reflect (full name, short name or label), comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub include: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every column of every visible model
    Schema,
    /// Print the visible apps and their models
    Apps,
    /// Print the inferred joins between models
    Joins,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let registry = installed_apps()?;
    let config = ReaderConfig::new().with_included_apps(
        args.include
            .iter()
            .map(|app| app.trim())
            .filter(|app| !app.is_empty()),
    );
    debug!(include = ?config.included_apps, format = %args.format, "Reflecting schema");

    let schema = ModelReader::from_registry(&registry, config).reflect_all();
    let formatter = formatter::create_formatter(args.format);

    let output = match args.command {
        Command::Schema => formatter.format_schema(&schema),
        Command::Apps => formatter.format_apps(&schema),
        Command::Joins => formatter.format_joins(&schema),
    };
    println!("{}", output);

    Ok(())
}
