//! Impounded Vehicle Management
//!
//! Impounded vehicles are stored as a JSON snapshot in a single file.

pub mod domain;
pub use domain::{Config, CorruptPolicy, MissingExpiry, Vehicle};

/// File-backed storage for vehicle records.
pub mod storage;
pub use storage::{AddError, LoadError, Store};
