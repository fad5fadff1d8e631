//! MDrive Response Parser
//!
//! The position query `PR C1 " " ER` answers with a single line
//! `"<position> <error>"`. The controller echoes every command first and may
//! emit blank lines before the reply, so anything that does not match the
//! two-integer shape is treated as noise and skipped.

use crate::communication::LineTransport;
use stepperkit_core::{PolledSample, Result};

/// Parser for MDrive position/status replies
#[derive(Debug, Clone, Copy, Default)]
pub struct MdriveResponseParser;

impl MdriveResponseParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a `"<position> <status>"` reply line
    ///
    /// Returns `None` for echoes, blank lines, or any other line that is not
    /// exactly two integers separated by a single space.
    pub fn parse(&self, line: &str) -> Option<PolledSample> {
        let mut tokens = line.trim().split(' ');
        let position = tokens.next()?.parse::<i64>().ok()?;
        let status = tokens.next()?.parse::<i32>().ok()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(PolledSample::new(position, status))
    }
}

/// Run `attempt` up to `max_attempts` times, stopping at the first `Some`
///
/// The closure receives the 1-based attempt number. Errors short-circuit
/// immediately; running out of attempts yields `Ok(None)`.
pub fn retry_bounded<T, F>(max_attempts: u32, mut attempt: F) -> Result<Option<T>>
where
    F: FnMut(u32) -> Result<Option<T>>,
{
    for n in 1..=max_attempts {
        if let Some(value) = attempt(n)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Read lines until one parses as a sample, consuming one line per attempt
pub fn read_until_valid<T>(
    transport: &mut T,
    parser: &MdriveResponseParser,
    max_attempts: u32,
    debug: bool,
) -> Result<Option<PolledSample>>
where
    T: LineTransport + ?Sized,
{
    retry_bounded(max_attempts, |attempt| {
        let line = transport.read_line()?;
        if debug {
            tracing::debug!(attempt, "rx: {}", line);
        }
        Ok(parser.parse(&line))
    })
}
