//! rollsink CLI
//!
//! Command-line front end for the rotating file writer.
//!
//! # Commands
//!
//! - `write` - Stream stdin into rotating files
//! - `inspect` - List the files a template has produced

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rotating file sink for byte streams.
#[derive(Parser)]
#[command(name = "rollsink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path template, e.g. /var/log/capture.pcap
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream stdin into rotating files
    Write {
        /// Rotate once a file holds this many bytes (0 = never)
        #[arg(short, long)]
        size_limit: Option<u64>,

        /// JSON file with `path` and `sizeLimit`
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Create the template's parent directory if missing
        #[arg(long)]
        create_dirs: bool,

        /// Bytes read from stdin per write
        #[arg(long, default_value_t = commands::write::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// List the files a template has produced
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Write {
            size_limit,
            config,
            create_dirs,
            chunk_size,
        } => {
            let config =
                commands::load_config(config.as_deref(), cli.path, size_limit, create_dirs)?;
            commands::write::run(config, chunk_size)?;
        }
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Template path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Version => {
            println!("rollsink CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
