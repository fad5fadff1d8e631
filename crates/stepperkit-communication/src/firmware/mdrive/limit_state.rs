//! Limit-switch tracking
//!
//! When the axis runs into an end stop the firmware latches error 83 (upper)
//! or 84 (lower) and keeps reporting it until told `ER 0`. The tracker
//! remembers where the axis got pinned and only releases the fault once a
//! sample shows it has moved back away from that coordinate.

use stepperkit_core::constants::{CLEAR_ERROR_COMMAND, STATUS_LOWER_LIMIT, STATUS_UPPER_LIMIT};
use stepperkit_core::{PolledSample, StatusCode};

/// Result of feeding one sample to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitUpdate {
    /// Error code to publish after this sample
    pub error_code: i32,
    /// Command to queue for the firmware, if any
    pub corrective_command: Option<&'static str>,
    /// A pinned limit was released by this sample
    pub resolved: bool,
}

/// Tracks whether the axis is pinned against a limit switch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimitTracker {
    lower_limit_position: Option<f64>,
    upper_limit_position: Option<f64>,
}

impl LimitTracker {
    /// Create a tracker with no limit asserted
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to start pinned at the lower limit
    pub fn with_lower_limit(mut self, position: f64) -> Self {
        self.lower_limit_position = Some(position);
        self
    }

    /// Builder method to start pinned at the upper limit
    pub fn with_upper_limit(mut self, position: f64) -> Self {
        self.upper_limit_position = Some(position);
        self
    }

    pub fn lower_limit_position(&self) -> Option<f64> {
        self.lower_limit_position
    }

    pub fn upper_limit_position(&self) -> Option<f64> {
        self.upper_limit_position
    }

    /// Check if either limit is currently asserted
    pub fn is_pinned(&self) -> bool {
        self.lower_limit_position.is_some() || self.upper_limit_position.is_some()
    }

    /// Apply one sample given the currently published error code
    ///
    /// Moving off a pinned limit clears it and resets the error code; in that
    /// case the sample's own status is not looked at. Otherwise a limit status
    /// pins the axis at the sample position and asks for the firmware latch to
    /// be cleared. This fires on every such sample, not only the first one.
    pub fn observe(&mut self, sample: PolledSample, error_code: i32) -> LimitUpdate {
        let position = sample.position as f64;
        let mut update = LimitUpdate {
            error_code,
            corrective_command: None,
            resolved: false,
        };

        if let Some(lower) = self.lower_limit_position {
            if position > lower {
                tracing::info!("Axis moved off lower limit ({} -> {})", lower, position);
                self.lower_limit_position = None;
                update.error_code = 0;
                update.resolved = true;
            }
        }

        if let Some(upper) = self.upper_limit_position {
            if position < upper {
                tracing::info!("Axis moved off upper limit ({} -> {})", upper, position);
                self.upper_limit_position = None;
                update.error_code = 0;
                update.resolved = true;
            }
        }

        if update.resolved {
            return update;
        }

        match sample.status_code() {
            StatusCode::UpperLimit => {
                tracing::warn!("Upper limit switch triggered at {}", position);
                self.upper_limit_position = Some(position);
                update.error_code = STATUS_UPPER_LIMIT;
                update.corrective_command = Some(CLEAR_ERROR_COMMAND);
            }
            StatusCode::LowerLimit => {
                tracing::warn!("Lower limit switch triggered at {}", position);
                self.lower_limit_position = Some(position);
                update.error_code = STATUS_LOWER_LIMIT;
                update.corrective_command = Some(CLEAR_ERROR_COMMAND);
            }
            StatusCode::Normal | StatusCode::Other(_) => {}
        }

        update
    }
}
