use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::store::postgres::DEFAULT_MAX_CONNECTIONS;

/// Configuration for the roster service
///
/// Layering, lowest to highest precedence: built-in defaults, TOML file,
/// environment variables, command-line flags (applied by the binary).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub server: ServerSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            request_timeout_secs: 30,
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Explicit backend; when unset, postgres is used if a database URL is known
    pub backend: Option<StorageBackend>,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: None,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => bail!("unknown storage backend '{}' (expected postgres or memory)", other),
        }
    }
}

impl StorageSection {
    pub fn resolved_backend(&self) -> StorageBackend {
        match (self.backend, &self.database_url) {
            (Some(backend), _) => backend,
            (None, Some(_)) => StorageBackend::Postgres,
            (None, None) => StorageBackend::Memory,
        }
    }
}

impl RosterConfig {
    /// Get config file path: ~/.roster/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".roster/config.toml")
    }

    /// Load config from an explicit path, or from the default path if it exists.
    ///
    /// An explicit path that doesn't exist is an error; a missing default file
    /// yields the built-in defaults. Environment overrides are applied after.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_from(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config not found at {:?}", path);
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// Apply environment overrides using the supplied lookup.
    ///
    /// Recognised: `DATABASE_URL`, `ROSTER_STORAGE`, `ROSTER_BIND`,
    /// `ROSTER_MAX_CONNECTIONS`, `ROSTER_REQUEST_TIMEOUT_SECS`,
    /// `ROSTER_CORS_PERMISSIVE`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.storage.database_url = Some(url);
        }
        if let Some(backend) = lookup("ROSTER_STORAGE") {
            self.storage.backend = Some(backend.parse()?);
        }
        if let Some(bind) = lookup("ROSTER_BIND") {
            self.server.bind = bind
                .parse()
                .context(format!("Invalid ROSTER_BIND address: {}", bind))?;
        }
        if let Some(max) = lookup("ROSTER_MAX_CONNECTIONS") {
            self.storage.max_connections = max
                .parse()
                .context(format!("Invalid ROSTER_MAX_CONNECTIONS: {}", max))?;
        }
        if let Some(secs) = lookup("ROSTER_REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = secs
                .parse()
                .context(format!("Invalid ROSTER_REQUEST_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(flag) = lookup("ROSTER_CORS_PERMISSIVE") {
            self.server.cors_permissive = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        Ok(())
    }

    /// Check values that would otherwise fail late at startup.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_connections == 0 {
            bail!("storage.max_connections must be at least 1");
        }
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be at least 1");
        }
        if self.storage.resolved_backend() == StorageBackend::Postgres
            && self.storage.database_url.is_none()
        {
            bail!("postgres storage selected but no database URL set (DATABASE_URL or storage.database_url)");
        }
        Ok(())
    }
}
