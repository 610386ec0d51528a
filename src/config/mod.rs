// src/config/mod.rs

//! Configuration loading and validation for hashwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like interval syntax and file names (`validate.rs`).
//! - Merge the config file with CLI overrides (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile, WatchSection};
pub use settings::{WatchSettings, DEFAULT_INTERVAL};
