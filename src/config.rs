//! Configuration for kaido-store
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single log file backing the store.
    /// Compaction writes its temporary file next to it, so the
    /// containing directory must be writable.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: whether appends are fsynced
    pub sync_strategy: SyncStrategy,

    /// Rewrite the log to one record per key when the store closes
    pub compact_on_close: bool,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Leave flushing to the OS (fastest, recent writes may be lost on crash)
    #[default]
    Never,

    /// fsync after every append (safest, slowest)
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./kaido_data/store.db"),
            sync_strategy: SyncStrategy::Never,
            compact_on_close: true,
        }
    }
}

impl Config {
    const HOME_SUBDIR: &'static str = ".kaido";
    const STORE_FILENAME: &'static str = "store.db";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config rooted at `~/.kaido/store.db`
    pub fn home_default() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::Config("cannot resolve home directory".to_string()))?;

        Ok(Self {
            path: home.join(Self::HOME_SUBDIR).join(Self::STORE_FILENAME),
            ..Self::default()
        })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Enable or disable compaction on close
    pub fn compact_on_close(mut self, enabled: bool) -> Self {
        self.config.compact_on_close = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
