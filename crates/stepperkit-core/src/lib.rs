//! # StepperKit Core
//!
//! Core types and utilities shared by the StepperKit crates.
//! Provides the error taxonomy, the published controller snapshot,
//! firmware status codes, and the startup/poll program model.

pub mod constants;
pub mod data;
pub mod error;
pub mod types;

pub use data::{
    program::{PollProgram, PollStep, StartupProgram},
    ControllerPhase, PolledSample, StatusCode, StepperSnapshot,
};

pub use error::{ConnectionError, ControllerError, Error, Result};

pub use types::{shared_flag, thread_safe_rw, SharedFlag, ThreadSafeRw};
