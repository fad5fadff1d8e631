//! Line-oriented transport to the stepper controller
//!
//! The controller speaks plain text: every command is one line, every reply
//! is one or more lines. [`LineTransport`] captures exactly that contract so
//! the control loop can run against a real serial port or a scripted test
//! double.

pub mod command_channel;
pub mod serial;

use serde::{Deserialize, Serialize};
use stepperkit_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS, LINE_ENDING};
use stepperkit_core::{ConnectionError, Result};

/// Blocking, line-oriented link to a controller
///
/// Implementations are owned by a single control loop; no method is ever
/// called concurrently with another.
pub trait LineTransport: Send {
    /// Write one command line, appending the configured terminator
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Read one line of response text, terminator and whitespace stripped
    fn read_line(&mut self) -> Result<String>;

    /// Discard any unread input
    fn reset_input_buffer(&mut self) -> Result<()>;

    /// Discard any unsent output
    fn reset_output_buffer(&mut self) -> Result<()>;

    /// Human-readable name of the link
    fn name(&self) -> String {
        "transport".to_string()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String> {
        (**self).read_line()
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        (**self).reset_input_buffer()
    }

    fn reset_output_buffer(&mut self) -> Result<()> {
        (**self).reset_output_buffer()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Serial parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialParity {
    /// No parity bit
    #[default]
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Parameters for opening a serial link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Port name (e.g. "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
    /// Terminator appended to outbound lines
    pub line_ending: String,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1-2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
    /// Hardware flow control
    pub flow_control: bool,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            line_ending: LINE_ENDING.to_string(),
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            flow_control: false,
        }
    }
}

impl ConnectionParams {
    /// Create parameters for a port with default line settings
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Builder method to set the read timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Builder method to set the outbound line terminator
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    /// Check the parameters before opening a port
    pub fn validate(&self) -> Result<()> {
        if self.port.is_empty() {
            return Err(ConnectionError::InvalidParameters {
                reason: "port name is empty".to_string(),
            }
            .into());
        }
        if self.baud_rate == 0 {
            return Err(ConnectionError::UnsupportedBaudRate {
                baud: self.baud_rate,
            }
            .into());
        }
        if self.line_ending.is_empty() {
            return Err(ConnectionError::InvalidParameters {
                reason: "line ending is empty".to_string(),
            }
            .into());
        }
        if !(5..=8).contains(&self.data_bits) {
            return Err(ConnectionError::InvalidParameters {
                reason: format!("invalid data bits: {}", self.data_bits),
            }
            .into());
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(ConnectionError::InvalidParameters {
                reason: format!("invalid stop bits: {}", self.stop_bits),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_controller() {
        let params = ConnectionParams::new("/dev/ttyUSB0");
        assert_eq!(params.baud_rate, 9600);
        assert_eq!(params.line_ending, "\r");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(ConnectionParams::default().validate().is_err());
        assert!(ConnectionParams::new("COM3")
            .with_baud_rate(0)
            .validate()
            .is_err());

        let mut params = ConnectionParams::new("COM3");
        params.data_bits = 9;
        assert!(params.validate().is_err());
    }
}
