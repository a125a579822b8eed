//! Domain models for impound management.
//!
//! This module contains the vehicle record, the duration parsing and expiry
//! rules, and configuration.

/// Impound duration parsing and expiry calculation.
pub mod duration;
pub use duration::MissingExpiry;

mod vehicle;
pub use vehicle::{Vehicle, now};

mod config;
pub use config::{CONFIG_FILE, Config, CorruptPolicy};
