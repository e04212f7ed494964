//! HTTP server command
//!
//! Opens the configured store and serves the employee API until shutdown.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use roster_core::{
    EmployeeService, EmployeeStore, MemoryStore, PgStore, RosterConfig, StorageBackend,
};
use roster_server::{run_server, ServerConfig};

use super::{load_config, StorageArg};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Storage backend (default: postgres when a database URL is set, else memory)
    #[arg(long, value_enum)]
    pub storage: Option<StorageArg>,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum database connections in the pool
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    /// Flags take precedence over every other config layer.
    pub fn apply(&self, config: &mut RosterConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(storage) = self.storage {
            config.storage.backend = Some(storage.into());
        }
        if let Some(url) = &self.database_url {
            config.storage.database_url = Some(url.clone());
        }
        if let Some(max) = self.max_connections {
            config.storage.max_connections = max;
        }
        if let Some(secs) = self.timeout {
            config.server.request_timeout_secs = secs;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    let store = open_store(&config).await?;
    let service = EmployeeService::new(store);

    tracing::info!("Starting roster server on {}", config.server.bind);

    // Blocks until shutdown
    run_server(service, ServerConfig::from(&config))
        .await
        .context("Server error")?;

    Ok(())
}

async fn open_store(config: &RosterConfig) -> Result<Arc<dyn EmployeeStore>> {
    match config.storage.resolved_backend() {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.roster/config.toml")?;
            let store = PgStore::connect(url, config.storage.max_connections)
                .await
                .context("Failed to connect to database")?;
            Ok(Arc::new(store))
        }
    }
}
