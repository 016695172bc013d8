//! Fingerbox Settings Crate
//!
//! Loads, validates and saves box configurations.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, ConfigFormat};
pub use error::{SettingsError, SettingsResult};
