//! List operations
//!
//! Every operation reads the whole [`Array`] stored under a key, works on it
//! in memory and, when it changed, writes the whole thing back. Mutations hold
//! the key lock for the full read-modify-write cycle.

use tracing::warn;

use crate::error::{NsError, Result};
use crate::value::{self, Array, EnvelopeKind, Index, Value};

use super::Table;

impl Table {
    /// Read the array under `key`
    ///
    /// Returns `Ok(None)` when the key is missing or doesn't hold an array.
    pub fn get_array(&self, key: &str) -> Result<Option<Array>> {
        match self.try_get_array(key) {
            Err(NsError::Decode(reason)) => {
                warn!(table = %self.name, key, %reason, "discarding undecodable array");
                Ok(None)
            }
            other => other,
        }
    }

    /// Read the array under `key`, surfacing decode failures as `NsError::Decode`
    pub fn try_get_array(&self, key: &str) -> Result<Option<Array>> {
        match self.get_value(key)? {
            Some(bytes) => value::decode(EnvelopeKind::Array, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Replace the array under `key`
    pub fn set_array(&self, key: &str, array: &Array) -> Result<()> {
        let bytes = value::encode(EnvelopeKind::Array, array)?;
        self.set_value(key, bytes)
    }

    /// Add `value` to the array under `key`
    ///
    /// With no index the value is appended at the next integer index; with one
    /// it is stored there, replacing any element already at that index. A
    /// missing (or undecodable) array starts out empty. Returns the index used.
    pub fn push_array(
        &self,
        key: &str,
        value: impl Into<Value>,
        index: Option<Index>,
    ) -> Result<Index> {
        let path = self.entry_path(key)?;
        let _guard = self.shared.locks.lock(&path);

        let mut array = self.get_array(key)?.unwrap_or_default();
        let index = match index {
            Some(index) => {
                array.insert(index.clone(), value);
                index
            }
            None => array.push(value),
        };
        self.write_array(key, &array)?;
        Ok(index)
    }

    /// Whether any element of the array strictly equals `value`
    ///
    /// A missing array counts as empty.
    pub fn in_array(&self, key: &str, value: &Value) -> Result<bool> {
        Ok(self
            .get_array(key)?
            .map_or(false, |array| array.contains_value(value)))
    }

    /// Number of elements in the array (0 when missing)
    pub fn count_array(&self, key: &str) -> Result<usize> {
        Ok(self.get_array(key)?.map_or(0, |array| array.len()))
    }

    /// Whether the array has an element at `index`
    pub fn exists_array(&self, key: &str, index: impl Into<Index>) -> Result<bool> {
        let index = index.into();
        Ok(self
            .get_array(key)?
            .map_or(false, |array| array.contains_index(&index)))
    }

    /// Remove the element at `index`, leaving a hole
    ///
    /// Nothing is written when there is no such element.
    pub fn unset_array(&self, key: &str, index: impl Into<Index>) -> Result<()> {
        let index = index.into();
        let path = self.entry_path(key)?;
        let _guard = self.shared.locks.lock(&path);

        let Some(mut array) = self.get_array(key)? else {
            return Ok(());
        };
        if array.remove(&index).is_some() {
            self.write_array(key, &array)?;
        }
        Ok(())
    }

    /// Renumber the array densely from 0, keeping element order
    ///
    /// A missing array is left missing.
    pub fn reindex_array(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        let _guard = self.shared.locks.lock(&path);

        let Some(mut array) = self.get_array(key)? else {
            return Ok(());
        };
        array.reindex();
        self.write_array(key, &array)
    }

    /// Encode and write without taking the key lock (caller holds it)
    fn write_array(&self, key: &str, array: &Array) -> Result<()> {
        let bytes = value::encode(EnvelopeKind::Array, array)?;
        self.write_entry(key, &bytes)
    }
}
