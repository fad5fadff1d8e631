//! Configuration and settings management for StepperKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into two sections:
//! - Connection settings (port, baud rate, timeout, line ending)
//! - Stepper settings (startup/poll programs, delays, read attempts)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stepperkit_communication::{ConnectionParams, ControllerOptions};
use stepperkit_core::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS, LINE_ENDING, MAX_READ_ATTEMPTS, READY_DELAY_MS,
    SETTLE_DELAY_MS, STARTUP_DELAY_MS,
};
use stepperkit_core::{PollProgram, StartupProgram};

const APP_DIR: &str = "stepperkit";
const CONFIG_FILE: &str = "config.toml";
const MAX_READ_ATTEMPTS_LIMIT: u32 = 100;

/// Serial connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port name (e.g. "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
    /// Terminator appended to each command
    pub line_ending: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            line_ending: LINE_ENDING.to_string(),
        }
    }
}

/// Controller session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperSettings {
    /// Log every command sent and line received
    pub debug: bool,
    /// Pause before the first startup command
    pub startup_delay_ms: u64,
    /// Pause after each startup command
    pub settle_delay_ms: u64,
    /// Pause after the last startup command
    pub ready_delay_ms: u64,
    /// Lines read per poll before the reply is abandoned
    pub max_read_attempts: u32,
    /// Commands sent once at session start
    pub startup_program: StartupProgram,
    /// Steps run on every idle iteration
    pub poll_program: PollProgram,
}

impl Default for StepperSettings {
    fn default() -> Self {
        Self {
            debug: false,
            startup_delay_ms: STARTUP_DELAY_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            ready_delay_ms: READY_DELAY_MS,
            max_read_attempts: MAX_READ_ATTEMPTS,
            startup_program: StartupProgram::default(),
            poll_program: PollProgram::default(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Stepper settings
    pub stepper: StepperSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config_dir>/stepperkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file, else the platform file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.baud_rate == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "connection.baud_rate".to_string(),
                value: self.connection.baud_rate.to_string(),
            }
            .into());
        }

        if self.connection.line_ending.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "connection.line_ending".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if !(1..=MAX_READ_ATTEMPTS_LIMIT).contains(&self.stepper.max_read_attempts) {
            return Err(ConfigError::ValueOutOfRange {
                key: "stepper.max_read_attempts".to_string(),
                value: self.stepper.max_read_attempts.to_string(),
            }
            .into());
        }

        if !self.stepper.poll_program.has_read_step() {
            return Err(SettingsError::InvalidSetting {
                key: "stepper.poll_program".to_string(),
                reason: "must contain at least one read step".to_string(),
            });
        }

        Ok(())
    }

    /// Serial parameters for opening the port
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(&self.connection.port)
            .with_baud_rate(self.connection.baud_rate)
            .with_timeout_ms(self.connection.timeout_ms)
            .with_line_ending(&self.connection.line_ending)
    }

    /// Programs and timing for the control loop
    pub fn controller_options(&self) -> ControllerOptions {
        let stepper = &self.stepper;
        ControllerOptions {
            startup_program: stepper.startup_program.clone(),
            poll_program: stepper.poll_program.clone(),
            startup_delay: Duration::from_millis(stepper.startup_delay_ms),
            settle_delay: Duration::from_millis(stepper.settle_delay_ms),
            ready_delay: Duration::from_millis(stepper.ready_delay_ms),
            max_read_attempts: stepper.max_read_attempts,
            debug: stepper.debug,
        }
    }
}
