//! Array implementation
//!
//! Insertion-ordered map from `Index` to `Value`, stored as a plain vector of
//! pairs. Lists kept in a single entry file are small enough that linear
//! lookups beat the bookkeeping of a hashed index.

use serde::{Deserialize, Serialize};

use super::{Index, Value};

/// Ordered, keyed collection of values
///
/// Appending assigns the next integer index: one past the largest
/// non-negative integer index present, or 0 if there is none. Removing an
/// element leaves a hole until [`Array::reindex`] is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Array {
    entries: Vec<(Index, Value)>,
}

impl Array {
    /// Create a new empty Array
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index the next `push` will use
    pub fn next_index(&self) -> i64 {
        self.entries
            .iter()
            .filter_map(|(index, _)| match index {
                Index::Int(i) if *i >= 0 => Some(i.saturating_add(1)),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Append a value at the next integer index, returning that index
    pub fn push(&mut self, value: impl Into<Value>) -> Index {
        let index = Index::Int(self.next_index());
        self.entries.push((index.clone(), value.into()));
        index
    }

    /// Set the value at `index`
    ///
    /// An existing slot is overwritten in place (its position is kept) and the
    /// previous value returned; a new slot goes to the end.
    pub fn insert(&mut self, index: impl Into<Index>, value: impl Into<Value>) -> Option<Value> {
        let index = index.into();
        let value = value.into();
        match self.position(&index) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.entries.push((index, value));
                None
            }
        }
    }

    pub fn get(&self, index: &Index) -> Option<&Value> {
        self.position(index).map(|pos| &self.entries[pos].1)
    }

    pub fn contains_index(&self, index: &Index) -> bool {
        self.position(index).is_some()
    }

    /// Strict-equality membership test over values (indexes are ignored)
    pub fn contains_value(&self, value: &Value) -> bool {
        self.entries.iter().any(|(_, v)| v == value)
    }

    /// Remove the element at `index`, leaving a hole
    pub fn remove(&mut self, index: &Index) -> Option<Value> {
        self.position(index).map(|pos| self.entries.remove(pos).1)
    }

    /// Renumber elements densely from 0, keeping their relative order
    pub fn reindex(&mut self) {
        for (i, (index, _)) in self.entries.iter_mut().enumerate() {
            *index = Index::Int(i as i64);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Index, &Value)> {
        self.entries.iter().map(|(i, v)| (i, v))
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.entries.iter().map(|(i, _)| i)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    fn position(&self, index: &Index) -> Option<usize> {
        self.entries.iter().position(|(i, _)| i == index)
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut array = Array::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl<V: Into<Value>> From<Vec<V>> for Array {
    fn from(values: Vec<V>) -> Self {
        values.into_iter().collect()
    }
}

impl IntoIterator for Array {
    type Item = (Index, Value);
    type IntoIter = std::vec::IntoIter<(Index, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
