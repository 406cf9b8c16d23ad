//! Value Module
//!
//! The structured values nsdb stores for list entries and the codec used to
//! turn any serde value into entry bytes.
//!
//! ## Responsibilities
//! - `Value`: tagged variant for scalars, raw bytes and nested arrays
//! - `Index`: integer or string position inside an `Array`
//! - `Array`: insertion-ordered keyed collection (holes allowed)
//! - Codec: versioned, checksummed envelope around bincode

mod array;
mod codec;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use array::Array;
pub use codec::{decode, encode, EnvelopeKind, HEADER_SIZE, MAGIC, VERSION};

/// A single element stored inside an [`Array`]
///
/// Equality is strict: `Int(1)` is not equal to `Float(1.0)` or `Str("1")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Array),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Position of an element inside an [`Array`]
///
/// Strings holding a canonical decimal integer (`"7"`, `"-2"`, but not `"07"`
/// or `"+7"`) collapse to `Int`, so `"7"` and `7` name the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    Int(i64),
    Str(String),
}

impl Index {
    fn from_text(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(i) if i.to_string() == s => Index::Int(i),
            _ => Index::Str(s.to_string()),
        }
    }
}

impl From<i64> for Index {
    fn from(i: i64) -> Self {
        Index::Int(i)
    }
}

impl From<i32> for Index {
    fn from(i: i32) -> Self {
        Index::Int(i64::from(i))
    }
}

/// Positions past `i64::MAX` saturate to `i64::MAX`
impl From<usize> for Index {
    fn from(i: usize) -> Self {
        Index::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Index {
    fn from(s: &str) -> Self {
        Index::from_text(s)
    }
}

impl From<String> for Index {
    fn from(s: String) -> Self {
        Index::from_text(&s)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Int(i) => write!(f, "{}", i),
            Index::Str(s) => write!(f, "{}", s),
        }
    }
}
