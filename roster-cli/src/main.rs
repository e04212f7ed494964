//! roster CLI - employee record store
//!
//! Entry point for running the HTTP API (`serve`) and preparing a
//! PostgreSQL database (`init-db`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use roster_core::RosterConfig;
use tracing::debug;

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    author,
    version,
    about = "Employee record store with an HTTP API",
    long_about = "Store employee records in PostgreSQL or memory and query them over HTTP: \
                  department listings, skill search and average salary per department."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.roster/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the employees table and indexes
    InitDb(commands::init_db::InitDbArgs),
}

/// Load `.env` from the working directory, then from ~/.roster/.env.
///
/// Existing environment variables are never overwritten. Runs before
/// argument parsing so `env`-backed flags see the loaded values.
fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    let config_path = RosterConfig::config_path();
    if let Some(env_file) = config_path.parent().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }
    loaded
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_files = load_dotenv();
    let cli = Cli::parse();
    if let Err(e) = init_tracing(&TracingConfig { debug: cli.debug }) {
        eprintln!("roster: failed to initialize logging: {:#}", e);
    }
    for path in &env_files {
        debug!("Loaded .env from {}", path.display());
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config_path).await?,
        Commands::InitDb(args) => commands::run_init_db(args, config_path).await?,
    }
    Ok(())
}
