//! Serial port transport implementation
//!
//! Provides the blocking serial link to the stepper controller over USB or
//! RS-232.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Baud rate, parity, stop bit, and flow control configuration
//! - Line framing on `\r`, `\n`, or `\r\n`

use crate::communication::{ConnectionParams, LineTransport, SerialParity};
use std::io::{self, Read, Write};
use std::time::Duration;
use stepperkit_core::{ConnectionError, Error, Result};

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// Serial number if available
    pub serial_number: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set serial number
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports that look like a stepper controller adapter
///
/// Filters to the usual USB-serial naming patterns:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::from(ConnectionError::SerialError {
            reason: format!("failed to enumerate ports: {}", e),
        })
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_valid_controller_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, get_port_description(port));

            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb_info) => {
                    let mut info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                    if let Some(ref mfg) = usb_info.manufacturer {
                        info = info.with_manufacturer(mfg);
                    }
                    if let Some(ref serial) = usb_info.serial_number {
                        info = info.with_serial_number(serial);
                    }
                    info
                }
                _ => info,
            }
        })
        .collect())
}

fn is_valid_controller_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

fn link_error(e: io::Error) -> Error {
    ConnectionError::ConnectionLost {
        reason: e.to_string(),
    }
    .into()
}

/// Splits a byte stream into lines on `\r`, `\n`, or `\r\n`
#[derive(Debug, Default)]
struct LineFramer {
    pending: Vec<u8>,
    skip_line_feed: bool,
}

impl LineFramer {
    fn push(&mut self, mut bytes: &[u8]) {
        if self.skip_line_feed && !bytes.is_empty() {
            if bytes[0] == b'\n' {
                bytes = &bytes[1..];
            }
            self.skip_line_feed = false;
        }
        self.pending.extend_from_slice(bytes);
    }

    fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|b| *b == b'\r' || *b == b'\n')?;
        let mut consumed = end + 1;
        if self.pending[end] == b'\r' {
            match self.pending.get(end + 1) {
                Some(b'\n') => consumed += 1,
                Some(_) => {}
                None => self.skip_line_feed = true,
            }
        }
        let line: Vec<u8> = self.pending.drain(..consumed).collect();
        Some(String::from_utf8_lossy(&line[..end]).trim().to_string())
    }

    fn take_partial(&mut self) -> String {
        let line: Vec<u8> = self.pending.drain(..).collect();
        String::from_utf8_lossy(&line).trim().to_string()
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.skip_line_feed = false;
    }
}

/// Serial link to a stepper controller using the serialport crate
///
/// A read that times out returns whatever partial text arrived (usually an
/// empty string) instead of failing, so a silent controller shows up as
/// unparseable replies rather than a dead link.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    port_name: String,
    line_ending: String,
    framer: LineFramer,
}

impl SerialTransport {
    /// Open a serial port and discard anything already buffered on it
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        params.validate()?;

        let data_bits = match params.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            _ => serialport::DataBits::Eight,
        };
        let stop_bits = match params.stop_bits {
            2 => serialport::StopBits::Two,
            _ => serialport::StopBits::One,
        };

        let port = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(params.timeout_ms))
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(to_serialport_parity(params.parity))
            .flow_control(if params.flow_control {
                serialport::FlowControl::Hardware
            } else {
                serialport::FlowControl::None
            })
            .open()
            .map_err(|e| {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                match e.kind() {
                    serialport::ErrorKind::NoDevice => ConnectionError::PortNotFound {
                        port: params.port.clone(),
                    },
                    _ => ConnectionError::FailedToOpen {
                        port: params.port.clone(),
                        reason: e.to_string(),
                    },
                }
            })?;

        let mut transport = Self {
            port,
            port_name: params.port.clone(),
            line_ending: params.line_ending.clone(),
            framer: LineFramer::default(),
        };
        transport.reset_input_buffer()?;
        transport.reset_output_buffer()?;

        tracing::info!(
            "Opened serial port {} at {} baud",
            params.port,
            params.baud_rate
        );
        Ok(transport)
    }

    fn clear(&mut self, buffer: serialport::ClearBuffer) -> Result<()> {
        self.port.clear(buffer).map_err(|e| {
            ConnectionError::SerialError {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl LineTransport for SerialTransport {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let framed = format!("{}{}", line, self.line_ending);
        self.port.write_all(framed.as_bytes()).map_err(link_error)?;
        self.port.flush().map_err(link_error)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut buf = [0u8; 64];
        loop {
            if let Some(line) = self.framer.next_line() {
                return Ok(line);
            }
            match self.port.read(&mut buf) {
                Ok(0) => return Ok(self.framer.take_partial()),
                Ok(n) => self.framer.push(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Ok(self.framer.take_partial());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(link_error(e)),
            }
        }
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        self.framer.clear();
        self.clear(serialport::ClearBuffer::Input)
    }

    fn reset_output_buffer(&mut self) -> Result<()> {
        self.clear(serialport::ClearBuffer::Output)
    }

    fn name(&self) -> String {
        self.port_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_port_patterns() {
        assert!(is_valid_controller_port("COM3"));
        assert!(is_valid_controller_port("/dev/ttyUSB0"));
        assert!(is_valid_controller_port("/dev/ttyACM1"));
        assert!(is_valid_controller_port("/dev/cu.usbserial-A10K"));
        assert!(!is_valid_controller_port("COM"));
        assert!(!is_valid_controller_port("/dev/ttyS0"));
    }

    #[test]
    fn test_framer_splits_on_crlf() {
        let mut framer = LineFramer::default();
        framer.push(b"PR C1 \" \" ER\r\n1500 0\r\n");
        assert_eq!(framer.next_line().as_deref(), Some("PR C1 \" \" ER"));
        assert_eq!(framer.next_line().as_deref(), Some("1500 0"));
        assert_eq!(framer.next_line(), None);
    }

    #[test]
    fn test_framer_handles_split_crlf() {
        let mut framer = LineFramer::default();
        framer.push(b"1500 0\r");
        assert_eq!(framer.next_line().as_deref(), Some("1500 0"));
        framer.push(b"\n-20 84\r");
        assert_eq!(framer.next_line().as_deref(), Some("-20 84"));
    }

    #[test]
    fn test_framer_keeps_empty_lines_between_bare_terminators() {
        let mut framer = LineFramer::default();
        framer.push(b"\n\n7 0\n");
        assert_eq!(framer.next_line().as_deref(), Some(""));
        assert_eq!(framer.next_line().as_deref(), Some(""));
        assert_eq!(framer.next_line().as_deref(), Some("7 0"));
    }

    #[test]
    fn test_framer_partial_line_on_timeout() {
        let mut framer = LineFramer::default();
        framer.push(b"15");
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.take_partial(), "15");
        assert_eq!(framer.take_partial(), "");
    }
}
