//! Command implementations for the roster CLI

pub mod init_db;
pub mod serve;

pub use init_db::run_init_db;
pub use serve::run_serve;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use roster_core::{RosterConfig, StorageBackend};

/// Storage backend selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArg {
    Memory,
    Postgres,
}

impl From<StorageArg> for StorageBackend {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Memory => StorageBackend::Memory,
            StorageArg::Postgres => StorageBackend::Postgres,
        }
    }
}

/// Load layered config (defaults, TOML file, environment).
pub fn load_config(path: Option<&Path>) -> Result<RosterConfig> {
    RosterConfig::load(path).context("Failed to load roster configuration")
}
