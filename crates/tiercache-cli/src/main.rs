//! tiercache CLI - drive a tiered cache from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Run the reference scenario on the default two-level hierarchy
//! tiercache demo
//!
//! # Replay a command script against a configured hierarchy
//! tiercache --config levels.toml replay script.txt
//!
//! # Read commands from stdin
//! echo "put a 1
//! get a" | tiercache replay -
//!
//! # Print the effective configuration
//! tiercache config
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tiercache::TieredCacheConfig;
use tiercache_cli::{StringCache, replay, run_demo};
use tracing::info;

#[derive(Parser)]
#[command(name = "tiercache")]
#[command(about = "Tiered key-value cache with per-level eviction policies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hierarchy configuration file (TOML)
    #[arg(short, long, global = true, env = "TIERCACHE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill level 0 past capacity, read back a key and print the hierarchy
    Demo,

    /// Execute a command script, one command per line
    Replay {
        /// Script path, or "-" for stdin
        script: PathBuf,
    },

    /// Print the effective hierarchy configuration
    Config,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => TieredCacheConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TieredCacheConfig::default(),
    };

    match cli.command {
        Commands::Config => print!("{}", config.to_toml_string()?),
        Commands::Demo => {
            let cache = build_cache(&config)?;
            run_demo(&cache, &mut io::stdout().lock())?;
        }
        Commands::Replay { script } => {
            let cache = build_cache(&config)?;
            let mut stdout = io::stdout().lock();
            let executed = if script.as_os_str() == "-" {
                replay(&cache, io::stdin().lock(), &mut stdout)?
            } else {
                let file = File::open(&script)
                    .with_context(|| format!("Failed to open script {}", script.display()))?;
                replay(&cache, BufReader::new(file), &mut stdout)?
            };
            info!("Executed {} command(s)", executed);
        }
    }

    Ok(())
}

fn build_cache(config: &TieredCacheConfig) -> Result<StringCache> {
    let cache = StringCache::from_config(config).context("Failed to build cache hierarchy")?;
    info!("Cache hierarchy ready with {} level(s)", cache.level_count());
    Ok(cache)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose {
        EnvFilter::new("tiercache=debug,tiercache_cli=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tiercache=info,tiercache_cli=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
