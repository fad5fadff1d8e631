//! # StepperKit
//!
//! A serial driver for single-axis MDrive stepper controllers:
//! - Sends a configuration program once at startup
//! - Polls position and status continuously
//! - Detects limit-switch faults and clears them once the axis backs off
//! - Accepts commands from any thread while polling runs
//!
//! ## Architecture
//!
//! StepperKit is organized as a workspace with multiple crates:
//!
//! 1. **stepperkit-core** - Errors, status codes, snapshots, programs
//! 2. **stepperkit-communication** - Serial transport, command queue, control loop
//! 3. **stepperkit-settings** - TOML/JSON configuration
//! 4. **stepperkit** - Main binary that integrates all crates

pub use stepperkit_communication::{
    command_channel, list_ports, CommandReceiver, CommandSender, ConnectionParams,
    ControllerOptions, LimitTracker, LimitUpdate, LineTransport, MdriveResponseParser,
    SerialPortInfo, SerialTransport, StepperController, StepperHandle,
};

pub use stepperkit_core::{
    ConnectionError, ControllerError, ControllerPhase, Error, PollProgram, PollStep, PolledSample,
    Result, StartupProgram, StatusCode, StepperSnapshot,
};

pub use stepperkit_settings::{Config, ConnectionSettings, SettingsError, StepperSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - `debug` level when `debug` is set, `info` otherwise
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
