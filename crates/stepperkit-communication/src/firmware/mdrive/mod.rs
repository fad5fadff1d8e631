//! MDrive Firmware Support
//!
//! Drives a single MDrive axis over its MCode text interface:
//! - Startup programming (microstepping, acceleration, velocity, run current, limit inputs)
//! - Position/error polling with echo-tolerant reply parsing
//! - Limit-switch tracking with automatic error latch clearing

pub mod controller;
pub mod limit_state;
pub mod response_parser;

pub use controller::{ControllerOptions, StepperController, StepperHandle};
pub use limit_state::{LimitTracker, LimitUpdate};
pub use response_parser::{read_until_valid, retry_bounded, MdriveResponseParser};
