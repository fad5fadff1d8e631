//! Startup and poll programs
//!
//! A startup program is a fixed list of configuration commands sent once
//! when a session starts. A poll program is the list of steps run on every
//! idle iteration of the control loop: literal commands to send, plus one
//! or more points where a position/status reply is read back.

use crate::constants::{DEFAULT_STARTUP_COMMANDS, POSITION_QUERY_COMMAND};
use serde::{Deserialize, Serialize};

/// One step of a poll program
///
/// Serialized as `{ send = "..." }` or the bare string `"read"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStep {
    /// Send a literal command
    Send(String),
    /// Read lines until a position/status reply parses
    Read,
}

impl PollStep {
    /// Create a send step
    pub fn send(command: impl Into<String>) -> Self {
        Self::Send(command.into())
    }
}

/// Commands sent once, in order, before polling starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StartupProgram(Vec<String>);

impl StartupProgram {
    /// Create a program from a list of commands
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(commands.into_iter().map(Into::into).collect())
    }

    /// A program that sends nothing
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Iterate over the commands in send order
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StartupProgram {
    fn default() -> Self {
        Self::new(DEFAULT_STARTUP_COMMANDS.iter().map(|(cmd, _)| *cmd))
    }
}

/// Steps run on every idle iteration of the control loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollProgram(Vec<PollStep>);

impl PollProgram {
    /// Create a program from a list of steps
    pub fn new(steps: Vec<PollStep>) -> Self {
        Self(steps)
    }

    /// Iterate over the steps in order
    pub fn steps(&self) -> impl Iterator<Item = &PollStep> {
        self.0.iter()
    }

    /// Check if the program ever reads a reply back
    pub fn has_read_step(&self) -> bool {
        self.0.iter().any(|step| matches!(step, PollStep::Read))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PollProgram {
    fn default() -> Self {
        Self(vec![PollStep::send(POSITION_QUERY_COMMAND), PollStep::Read])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_startup_program_order() {
        let program = StartupProgram::default();
        let commands: Vec<&str> = program.commands().collect();
        assert_eq!(
            commands,
            vec![
                "FD",
                "MS=16",
                "A=50000",
                "VA SP=12800",
                "VM=12800",
                "RC=85",
                "S1=3,1",
                "S2=2,1"
            ]
        );
    }

    #[test]
    fn test_default_poll_program() {
        let program = PollProgram::default();
        let steps: Vec<&PollStep> = program.steps().collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], &PollStep::Send("PR C1 \" \" ER".to_string()));
        assert_eq!(steps[1], &PollStep::Read);
        assert!(program.has_read_step());
        assert!(!PollProgram::new(vec![PollStep::send("PR P")]).has_read_step());
    }

    #[test]
    fn test_poll_step_json_shape() {
        let program = PollProgram::default();
        let json = serde_json::to_string(&program).unwrap();
        assert_eq!(json, r#"[{"send":"PR C1 \" \" ER"},"read"]"#);
        let back: PollProgram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
