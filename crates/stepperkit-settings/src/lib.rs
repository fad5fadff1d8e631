//! StepperKit Settings Crate
//!
//! Loads, validates, and saves the serial and controller configuration.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, StepperSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
