//! StreamJSON CLI
//!
//! Builds a JSON object incrementally from a list of operations and prints
//! the result.
//!
//! # Commands
//!
//! - `build` - Apply operations given as arguments
//! - `script` - Apply operations read from a file, one per line
//!
//! # Operations
//!
//! - `key=<json>` sets a member (text that is not JSON is stored as a string)
//! - `-key` deletes a member
//! - `@name` sets the variable prefix, `@` clears it

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use streamjson_core::{Config, StoreKind};
use streamjson_storage::DEFAULT_SPILL_THRESHOLD;
use tracing_subscriber::EnvFilter;

/// Incremental JSON object builder.
#[derive(Parser)]
#[command(name = "streamjson")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Backing store (memory, temp, spooled)
    #[arg(global = true, short, long, default_value_t = StoreKind::Memory)]
    store: StoreKind,

    /// Bytes a spooled store keeps in memory before moving to disk
    #[arg(global = true, long, default_value_t = DEFAULT_SPILL_THRESHOLD)]
    spill_threshold: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply operations left to right and print the object
    Build {
        /// Operations (`key=<json>`, `-key`, `@name`, `@`)
        #[arg(allow_hyphen_values = true)]
        ops: Vec<String>,
    },

    /// Apply operations from a file, one per line
    Script {
        /// Operation file; blank lines and `#` comments are skipped
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new()
        .store(cli.store)
        .spill_threshold(cli.spill_threshold);

    match cli.command {
        Commands::Build { ops } => commands::build::run(config, &ops)?,
        Commands::Script { file } => commands::script::run(config, &file)?,
        Commands::Version => {
            println!("StreamJSON CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("StreamJSON Core v{}", streamjson_core::VERSION);
        }
    }

    Ok(())
}
