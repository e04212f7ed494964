//! Create the employees table and indexes on a PostgreSQL database.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use roster_core::PgStore;

use super::load_config;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn run_init_db(args: InitDbArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let url = args
        .database_url
        .or(config.storage.database_url)
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.roster/config.toml")?;

    // connect() runs the schema bootstrap
    let store = PgStore::connect(&url, 1)
        .await
        .context("Failed to initialize database schema")?;
    store.pool().close().await;

    tracing::info!("Database schema is up to date");
    Ok(())
}
