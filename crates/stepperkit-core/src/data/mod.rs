//! Data models for controller status and published state
//!
//! This module provides:
//! - Firmware status code classification
//! - Polled position/status samples
//! - Controller lifecycle phase
//! - The snapshot published by the control loop
//! - Startup and poll program definitions

pub mod program;

use crate::constants::{STATUS_LOWER_LIMIT, STATUS_NORMAL, STATUS_UPPER_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a status code reported by the firmware
///
/// Only the limit-switch codes are interpreted; everything else passes
/// through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// No error
    Normal,
    /// Upper (+) limit switch asserted
    UpperLimit,
    /// Lower (-) limit switch asserted
    LowerLimit,
    /// Any other firmware status
    Other(i32),
}

impl StatusCode {
    /// Raw integer code as reported by the firmware
    pub fn code(&self) -> i32 {
        match self {
            Self::Normal => STATUS_NORMAL,
            Self::UpperLimit => STATUS_UPPER_LIMIT,
            Self::LowerLimit => STATUS_LOWER_LIMIT,
            Self::Other(code) => *code,
        }
    }

    /// Check if this code signals a limit switch
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::UpperLimit | Self::LowerLimit)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            STATUS_NORMAL => Self::Normal,
            STATUS_UPPER_LIMIT => Self::UpperLimit,
            STATUS_LOWER_LIMIT => Self::LowerLimit,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::UpperLimit => write!(f, "upper limit ({})", STATUS_UPPER_LIMIT),
            Self::LowerLimit => write!(f, "lower limit ({})", STATUS_LOWER_LIMIT),
            Self::Other(code) => write!(f, "status {}", code),
        }
    }
}

/// One position/status pair read back from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolledSample {
    /// Position counter in microsteps
    pub position: i64,
    /// Raw status code
    pub status: i32,
}

impl PolledSample {
    /// Create a new sample
    pub fn new(position: i64, status: i32) -> Self {
        Self { position, status }
    }

    /// Classified status code
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from(self.status)
    }
}

/// Lifecycle phase of a controller session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// Startup program not yet finished
    #[default]
    Initializing,
    /// Steady-state polling
    Running,
    /// Loop exited, either on request or after a transport fault
    Terminated,
}

impl fmt::Display for ControllerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Running => write!(f, "Running"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Latest state published by the control loop
///
/// The loop owns the authoritative copy and replaces this snapshot as a
/// whole, so readers always see every field from the same update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepperSnapshot {
    /// Last parsed position; `None` until the first sample arrives
    pub current_position: Option<f64>,
    /// 0 when clear, otherwise the last latched firmware status code
    pub error_code: i32,
    /// Position where the lower limit switch tripped, while pinned
    pub lower_limit_position: Option<f64>,
    /// Position where the upper limit switch tripped, while pinned
    pub upper_limit_position: Option<f64>,
    /// Session lifecycle phase
    pub phase: ControllerPhase,
    /// Number of samples parsed so far
    pub samples: u64,
    /// Number of poll cycles abandoned without a sample
    pub missed_reads: u64,
}

impl StepperSnapshot {
    /// Create a snapshot for a session that has not polled yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Classified error code
    pub fn status(&self) -> StatusCode {
        StatusCode::from(self.error_code)
    }

    /// Check if the axis is currently held against either limit switch
    pub fn is_at_limit(&self) -> bool {
        self.lower_limit_position.is_some() || self.upper_limit_position.is_some()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
