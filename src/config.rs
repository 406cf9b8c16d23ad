//! Configuration for nsdb
//!
//! Centralized configuration with sensible defaults. A `Config` is handed to
//! [`Store::open`](crate::Store::open) once and never changes afterwards.

use std::path::PathBuf;

use crate::error::{NsError, Result};

/// Main configuration for an nsdb store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {root_dir}/
    ///     └── tables/
    ///           └── {table}/
    ///                 └── {key[0]}/
    ///                       └── {key}.ns
    pub root_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// How entry files are replaced on write
    pub write_mode: WriteMode,

    /// fsync every entry file before the write is reported done
    pub sync_writes: bool,
}

/// Strategy for replacing an entry file's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write a temp file in the shard directory, then rename it over the entry.
    /// Readers see either the old or the new value, never a torn one.
    Atomic,

    /// Truncate and write the entry in place (fewest syscalls)
    Direct,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./nsdb_data"),
            write_mode: WriteMode::Atomic,
            sync_writes: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values no store can work with
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(NsError::Config("root_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the write mode
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Enable or disable fsync on every write
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
