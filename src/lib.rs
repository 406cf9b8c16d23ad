//! # nsdb
//!
//! An embedded key-value store that keeps every value in its own file:
//! - Named tables, one directory each
//! - Keys sharded by their first character to bound directory size
//! - Raw, typed, serde-object and list values
//! - Atomic write-then-rename and per-key write locks
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │            (Config, key locks, table handles)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ table(name)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Table                              │
//! │        scalar get/set/unset  ·  list read-modify-write      │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │   Value codec   │               │  Entry files     │
//!   │ (NSV envelope)  │               │ {t}/{k[0]}/{k}.ns│
//!   └─────────────────┘               └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use nsdb::{Store, Value};
//!
//! # fn main() -> nsdb::Result<()> {
//! let store = Store::open_path("./nsdb_data")?;
//! store.init()?;
//!
//! let users = store.table("users")?;
//! users.set_string("alice", "admin")?;
//! users.push_array("roles", "reader", None)?;
//! assert!(users.in_array("roles", &Value::from("reader"))?);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod store;
pub mod table;

mod fsutil;
mod lock;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NsError, Result};
pub use config::{Config, WriteMode};
pub use store::Store;
pub use table::{Table, FILE_EXTENSION};
pub use value::{Array, Index, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nsdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
