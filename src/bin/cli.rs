//! kaido-store CLI
//!
//! Command-line interface for inspecting and editing a store file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kaido_store::{Config, StoreContext, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// kaido-store CLI
#[derive(Parser, Debug)]
#[command(name = "kaido-store")]
#[command(about = "Inspect and edit a kaido log-structured store")]
#[command(version)]
struct Args {
    /// Store file (defaults to ~/.kaido/store.db)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Skip compaction after `put` (read-only commands never compact)
    #[arg(long)]
    no_compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// List all live keys
    Keys,

    /// Show replay and size statistics
    Stats,

    /// Rewrite the log to one record per key
    Compact,
}

impl Commands {
    /// Whether closing the store after this command should rewrite the log
    fn compacts_on_close(&self, no_compact: bool) -> bool {
        match self {
            Commands::Compact => true,
            Commands::Put { .. } => !no_compact,
            Commands::Get { .. } | Commands::Keys | Commands::Stats => false,
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kaido_store=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, StoreError> {
    let base = match args.path {
        Some(path) => Config::builder().path(path).build(),
        None => Config::home_default()?,
    };
    let config = Config {
        compact_on_close: args.command.compacts_on_close(args.no_compact),
        ..base
    };

    let context = StoreContext::init(config)?;
    let store = context.store();

    let code = match args.command {
        Commands::Get { key } => match store.get(key.as_bytes()) {
            Ok(record) => {
                println!("{}", String::from_utf8_lossy(&record.value));
                ExitCode::SUCCESS
            }
            Err(e) if e.is_not_found() => {
                println!("not found");
                ExitCode::FAILURE
            }
            Err(e) => return Err(e),
        },
        Commands::Put { key, value } => {
            store.put_value(key, value)?;
            println!("OK");
            ExitCode::SUCCESS
        }
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
            ExitCode::SUCCESS
        }
        Commands::Stats => {
            let replay = store.replay_stats();
            println!("path:             {}", store.path().display());
            println!("live keys:        {}", replay.live_keys);
            println!("records replayed: {}", replay.records_replayed);
            println!("shadowed records: {}", replay.shadowed_records());
            println!("log size:         {} bytes", store.log_size()?);
            ExitCode::SUCCESS
        }
        Commands::Compact => ExitCode::SUCCESS,
    };

    if let Some(stats) = context.shutdown()? {
        tracing::info!(
            "Compacted {} keys, reclaimed {} bytes",
            stats.live_keys,
            stats.bytes_reclaimed()
        );
    }

    Ok(code)
}
