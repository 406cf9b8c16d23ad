//! Store Module
//!
//! Entry point of nsdb: owns the configuration and hands out tables.
//!
//! ## Responsibilities
//! - Bind a [`Config`] (the root every table path is derived from)
//! - Create the root and `tables/` directories
//! - Construct [`Table`] handles and drop whole tables
//! - Generic file and directory removal helpers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::fsutil;
use crate::lock::KeyLocks;
use crate::table::{self, Table};

/// State shared by a store and every table it hands out
pub(crate) struct StoreShared {
    pub(crate) config: Config,
    pub(crate) tables_dir: PathBuf,
    pub(crate) locks: KeyLocks,
}

/// Handle to an nsdb store rooted at `config.root_dir`
///
/// ## Concurrency:
/// - Cheap to clone; clones share configuration and key locks
/// - Tables from the same store serialize writers of the same key
/// - Two stores opened on the same root do NOT coordinate with each other
#[derive(Clone)]
pub struct Store {
    shared: Arc<StoreShared>,
}

impl Store {
    /// Name of the directory under the root that holds all tables
    pub const TABLES_DIR: &'static str = "tables";

    /// Bind a store to the given config
    ///
    /// Touches nothing on disk; call [`Store::init`] or just open a table.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let tables_dir = config.root_dir.join(Self::TABLES_DIR);

        Ok(Self {
            shared: Arc::new(StoreShared {
                config,
                tables_dir,
                locks: KeyLocks::default(),
            }),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().root_dir(path).build())
    }

    /// Create the root directory and its `tables/` subdirectory
    ///
    /// Existing directories are fine; anything else that stops creation is
    /// reported.
    pub fn init(&self) -> Result<()> {
        fsutil::ensure_dir(&self.shared.config.root_dir)?;
        fsutil::ensure_dir(&self.shared.tables_dir)?;
        debug!(root = %self.root().display(), "store initialized");
        Ok(())
    }

    /// Get a handle to the named table, creating its directory if needed
    pub fn table(&self, name: &str) -> Result<Table> {
        Table::open(Arc::clone(&self.shared), name)
    }

    /// Delete a table and everything in it, returning the number of files removed
    ///
    /// A table that was never created removes nothing and returns 0. Writers
    /// through this store wait until the drop is done.
    pub fn drop_table(&self, name: &str) -> Result<usize> {
        let path = table::table_dir(&self.shared, name)?;
        table::drop_dir(&self.shared, name, &path)
    }

    /// Delete a single file; always reports 1 removed on success
    pub fn remove_file(&self, path: &Path) -> Result<usize> {
        fsutil::remove_file(path)
    }

    /// Recursively delete a directory, returning the number of files removed
    ///
    /// Directories are not counted.
    pub fn remove_dir(&self, path: &Path) -> Result<usize> {
        fsutil::remove_dir(path)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.shared.config.root_dir
    }

    /// Get the directory holding all tables
    pub fn tables_dir(&self) -> &Path {
        &self.shared.tables_dir
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.shared.config)
            .finish()
    }
}
