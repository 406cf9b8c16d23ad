//! Key locks
//!
//! Striped mutexes serializing writers of the same entry file.
//!
//! ## Concurrency:
//! - A path hashes (CRC32) onto one of a fixed number of stripes
//! - Two different keys may share a stripe; that only costs contention
//! - Locks are not reentrant: take one per operation, at the public entry point
//! - Whole-table operations take every stripe, always in index order

use std::path::Path;

use parking_lot::{Mutex, MutexGuard};

/// Default number of stripes per store
pub const DEFAULT_STRIPES: usize = 64;

/// Fixed set of mutexes shared by every table of a store
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Block until the stripe for `path` is free and hold it
    pub fn lock(&self, path: &Path) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_of(path)].lock()
    }

    /// Hold every stripe, acquired in index order
    ///
    /// Single-key holders never take a second stripe, so this cannot deadlock
    /// against them.
    pub fn lock_all(&self) -> Vec<MutexGuard<'_, ()>> {
        self.stripes.iter().map(|stripe| stripe.lock()).collect()
    }

    fn stripe_of(&self, path: &Path) -> usize {
        let hash = crc32fast::hash(path.to_string_lossy().as_bytes());
        hash as usize % self.stripes.len()
    }

    #[cfg(test)]
    fn stripe_count(&self) -> usize {
        self.stripes.len()
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
