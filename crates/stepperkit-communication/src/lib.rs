//! # StepperKit Communication
//!
//! Serial transport and firmware control for single-axis stepper controllers.
//! The communication layer moves lines of text over a serial link and queues
//! outbound commands; the firmware layer programs an MDrive controller, polls
//! its position, and tracks limit-switch faults.

pub mod communication;
pub mod firmware;

pub use communication::{
    command_channel::{command_channel, CommandReceiver, CommandSender},
    serial::{list_ports, SerialPortInfo, SerialTransport},
    ConnectionParams, LineTransport, SerialParity,
};

pub use firmware::mdrive::{
    read_until_valid, retry_bounded, ControllerOptions, LimitTracker, LimitUpdate,
    MdriveResponseParser, StepperController, StepperHandle,
};
