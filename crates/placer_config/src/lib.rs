//! Tuning parameters for the placement engine and their `placer.toml` form.
//!
//! This crate defines the strongly-typed [`PlacementConfig`] with its
//! documented defaults, loads it from TOML, and validates every value that
//! must be positive or bounded before a run may start.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, to_toml_string, CONFIG_FILE_NAME};
pub use types::*;
