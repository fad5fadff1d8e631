//! Firmware implementations for stepper controllers
//!
//! Supported controllers:
//! - MDrive: integrated stepper motor/driver with an MCode text interpreter

pub mod mdrive;

pub use mdrive::{ControllerOptions, StepperController, StepperHandle};
