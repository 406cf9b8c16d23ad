//! Table Module
//!
//! A named collection of entries, one file per key.
//!
//! ## Responsibilities
//! - Map keys to their sharded file paths
//! - Raw byte get/set/unset
//! - Typed wrappers (string, integer, float) and serde objects
//! - List operations (see `list.rs`)
//!
//! ## Directory Layout
//! ```text
//! {root}/tables/{table}/
//!   ├── a/
//!   │   ├── alice.ns
//!   │   └── apple.ns
//!   └── b/
//!       └── banana.ns
//! ```
//!
//! The shard is the key's first character (case-sensitive). Shard
//! directories are created on first write and never pruned.

mod list;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{NsError, Result};
use crate::fsutil;
use crate::store::StoreShared;
use crate::value::{self, EnvelopeKind};

/// Extension of every entry file
pub const FILE_EXTENSION: &str = ".ns";

/// Handle to one table of a [`Store`](crate::Store)
///
/// Holds no data of its own; every call goes to disk.
#[derive(Clone)]
pub struct Table {
    name: String,
    path: PathBuf,
    shared: Arc<StoreShared>,
}

impl Table {
    /// Bind to `name` and make sure the table directory exists
    pub(crate) fn open(shared: Arc<StoreShared>, name: &str) -> Result<Self> {
        let path = table_dir(&shared, name)?;
        fsutil::ensure_dir(&path)?;
        debug!(table = name, path = %path.display(), "opened table");

        Ok(Self {
            name: name.to_string(),
            path,
            shared,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of this table: `{root}/tables/{name}`
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where `key` lives, whether or not it has been written
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self
            .shard_dir(key)?
            .join(format!("{}{}", key, FILE_EXTENSION)))
    }

    /// Get the entry file of `key` if it exists as a regular file
    pub fn exists(&self, key: &str) -> Result<Option<PathBuf>> {
        let shard = self.shard_dir(key)?;
        if !shard.is_dir() {
            return Ok(None);
        }
        let file = shard.join(format!("{}{}", key, FILE_EXTENSION));
        Ok(file.is_file().then_some(file))
    }

    /// Boolean form of [`Table::exists`]
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.exists(key)?.is_some())
    }

    // =========================================================================
    // Raw Values
    // =========================================================================

    /// Read the raw bytes of `key`
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` — key found
    /// - `Ok(None)` — key not set (or removed between the check and the read)
    pub fn get_value(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.exists(key)? else {
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `bytes` as the whole value of `key`
    pub fn set_value(&self, key: &str, bytes: impl AsRef<[u8]>) -> Result<()> {
        let path = self.entry_path(key)?;
        let _guard = self.shared.locks.lock(&path);
        self.write_entry(key, bytes.as_ref())
    }

    /// Remove `key`; a key that isn't set is a no-op
    pub fn unset(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        let _guard = self.shared.locks.lock(&path);
        let Some(file) = self.exists(key)? else {
            return Ok(());
        };
        match fsutil::remove_file(&file) {
            Ok(_) => Ok(()),
            Err(NsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Delete the table directory and everything in it
    ///
    /// Returns the number of files removed. Writers through the same store
    /// wait until the drop is done.
    pub fn drop_table(self) -> Result<usize> {
        drop_dir(&self.shared, &self.name, &self.path)
    }

    // =========================================================================
    // Typed Values
    // =========================================================================

    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_value(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| NsError::Decode(format!("key '{}': {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)
    }

    /// Read `key` as an integer
    ///
    /// Surrounding whitespace is ignored; anything else that doesn't parse is
    /// `NsError::InvalidNumber`.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_number(key)
    }

    pub fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.set_value(key, value.to_string())
    }

    /// Read `key` as a float (same parsing rules as [`Table::get_int`])
    pub fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_number(key)
    }

    pub fn set_float(&self, key: &str, value: f64) -> Result<()> {
        self.set_value(key, value.to_string())
    }

    fn get_number<N: FromStr>(&self, key: &str) -> Result<Option<N>> {
        let Some(bytes) = self.get_value(key)? else {
            return Ok(None);
        };
        let invalid = || NsError::InvalidNumber {
            key: key.to_string(),
            raw: String::from_utf8_lossy(&bytes).into_owned(),
        };
        let text = std::str::from_utf8(&bytes).map_err(|_| invalid())?;
        text.trim().parse().map(Some).map_err(|_| invalid())
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Serialize `object` and store it under `key`
    pub fn set_object<T: Serialize + ?Sized>(&self, key: &str, object: &T) -> Result<()> {
        let bytes = value::encode(EnvelopeKind::Object, object)?;
        self.set_value(key, bytes)
    }

    /// Read an object back, treating undecodable bytes as absent
    ///
    /// Use [`Table::try_get_object`] to tell a corrupt entry from a missing one.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.try_get_object(key) {
            Err(NsError::Decode(reason)) => {
                warn!(table = %self.name, key, %reason, "discarding undecodable object");
                Ok(None)
            }
            other => other,
        }
    }

    /// Read an object back, surfacing decode failures as `NsError::Decode`
    pub fn try_get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_value(key)? {
            Some(bytes) => value::decode(EnvelopeKind::Object, &bytes).map(Some),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write an entry without taking its key lock (caller holds it)
    fn write_entry(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let shard = self.shard_dir(key)?;
        if self.exists(key)?.is_none() {
            fsutil::ensure_dir(&shard)?;
        }
        let file = shard.join(format!("{}{}", key, FILE_EXTENSION));
        let config = &self.shared.config;
        fsutil::write_file(&file, bytes, config.write_mode, config.sync_writes)?;
        trace!(table = %self.name, key, len = bytes.len(), "set value");
        Ok(())
    }

    /// Shard directory of `key`: the table path joined with its first character
    fn shard_dir(&self, key: &str) -> Result<PathBuf> {
        let first = validate_key(key)?;
        Ok(self.path.join(first.to_string()))
    }
}

/// Check `key` maps to a file inside its shard and return its shard character
///
/// The shard may be `.` (keys like ".hidden"); `{table}/./.hidden.ns` still
/// resolves inside the table.
fn validate_key(key: &str) -> Result<char> {
    let first = key
        .chars()
        .next()
        .ok_or_else(|| NsError::InvalidKey("key must not be empty".to_string()))?;
    if !fsutil::is_single_segment(&format!("{}{}", key, FILE_EXTENSION)) {
        return Err(NsError::InvalidKey(format!(
            "key {:?} must not contain path separators or NUL",
            key
        )));
    }
    Ok(first)
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// Remove a table directory while holding every key lock of the store
pub(crate) fn drop_dir(shared: &StoreShared, name: &str, path: &Path) -> Result<usize> {
    let _guards = shared.locks.lock_all();
    if !path.is_dir() {
        return Ok(0);
    }
    let removed = fsutil::remove_dir(path)?;
    debug!(table = name, removed, "dropped table");
    Ok(removed)
}

/// Directory of table `name` under the store's `tables/` directory
pub(crate) fn table_dir(shared: &StoreShared, name: &str) -> Result<PathBuf> {
    if name.is_empty() {
        return Err(NsError::InvalidTable("table name must not be empty".to_string()));
    }
    if !fsutil::is_single_segment(name) {
        return Err(NsError::InvalidTable(format!(
            "table name {:?} must be a single directory name",
            name
        )));
    }
    Ok(shared.tables_dir.join(name))
}
