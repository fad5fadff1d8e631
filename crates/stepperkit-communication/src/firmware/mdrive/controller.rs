//! MDrive Controller Implementation
//!
//! Owns the serial link to a single MDrive axis and runs its control loop:
//! the startup program once, then forever either one queued command or one
//! pass of the poll program. Callers interact through a [`StepperHandle`],
//! which queues commands and reads the latest published snapshot.

use crate::communication::command_channel::{command_channel, CommandReceiver, CommandSender};
use crate::communication::LineTransport;
use crate::firmware::mdrive::limit_state::LimitTracker;
use crate::firmware::mdrive::response_parser::{read_until_valid, MdriveResponseParser};
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use stepperkit_core::constants::{
    MAX_READ_ATTEMPTS, READY_DELAY_MS, SETTLE_DELAY_MS, STARTUP_DELAY_MS,
};
use stepperkit_core::{
    shared_flag, thread_safe_rw, ControllerError, ControllerPhase, Error, PollProgram, PollStep,
    PolledSample, Result, SharedFlag, StartupProgram, StepperSnapshot, ThreadSafeRw,
};

/// Programs and timing for a controller session
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Commands sent once before polling starts
    pub startup_program: StartupProgram,
    /// Steps run on every idle iteration
    pub poll_program: PollProgram,
    /// Pause before the first startup command
    pub startup_delay: Duration,
    /// Pause after each startup command
    pub settle_delay: Duration,
    /// Pause after the last startup command
    pub ready_delay: Duration,
    /// Lines read per poll before giving up on a reply
    pub max_read_attempts: u32,
    /// Log every command sent and line received
    pub debug: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            startup_program: StartupProgram::default(),
            poll_program: PollProgram::default(),
            startup_delay: Duration::from_millis(STARTUP_DELAY_MS),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            ready_delay: Duration::from_millis(READY_DELAY_MS),
            max_read_attempts: MAX_READ_ATTEMPTS,
            debug: false,
        }
    }
}

impl ControllerOptions {
    /// Builder method to drop all startup pauses
    pub fn without_delays(mut self) -> Self {
        self.startup_delay = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self.ready_delay = Duration::ZERO;
        self
    }

    /// Builder method to enable traffic logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check that the options describe a runnable session
    pub fn validate(&self) -> Result<()> {
        if !self.poll_program.has_read_step() {
            return Err(ControllerError::InvalidProgram {
                reason: "poll program has no read step".to_string(),
            }
            .into());
        }
        if self.max_read_attempts == 0 {
            return Err(ControllerError::InvalidOptions {
                reason: "max_read_attempts must be > 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Caller-side view of a running controller
///
/// Clone freely; all clones share the same queue, flag, and snapshot.
#[derive(Debug, Clone)]
pub struct StepperHandle {
    commands: CommandSender,
    snapshot: ThreadSafeRw<StepperSnapshot>,
    terminate: SharedFlag,
}

impl StepperHandle {
    /// Queue a command for the firmware
    ///
    /// Safe to call at any time, including before the startup program has
    /// finished; queued commands wait until steady-state polling begins.
    pub fn enqueue_command(&self, command: impl Into<String>) {
        self.commands.enqueue(command);
    }

    /// Ask the loop to stop at the next iteration boundary
    pub fn request_terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_requested(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    /// Last parsed position, `None` until the first sample
    pub fn current_position(&self) -> Option<f64> {
        self.snapshot.read().current_position
    }

    /// Latest error code (0 when clear)
    pub fn error_code(&self) -> i32 {
        self.snapshot.read().error_code
    }

    /// Copy of the latest published state
    pub fn snapshot(&self) -> StepperSnapshot {
        self.snapshot.read().clone()
    }

    fn publish(&self, snapshot: StepperSnapshot) {
        *self.snapshot.write() = snapshot;
    }
}

/// State owned and mutated only by the control loop
#[derive(Debug, Default)]
struct Session {
    current_position: Option<f64>,
    error_code: i32,
    limits: LimitTracker,
    phase: ControllerPhase,
    samples: u64,
    missed_reads: u64,
}

impl Session {
    fn apply(&mut self, sample: PolledSample) -> Option<&'static str> {
        let update = self.limits.observe(sample, self.error_code);
        self.current_position = Some(sample.position as f64);
        self.error_code = update.error_code;
        self.samples += 1;
        update.corrective_command
    }

    fn snapshot(&self) -> StepperSnapshot {
        StepperSnapshot {
            current_position: self.current_position,
            error_code: self.error_code,
            lower_limit_position: self.limits.lower_limit_position(),
            upper_limit_position: self.limits.upper_limit_position(),
            phase: self.phase,
            samples: self.samples,
            missed_reads: self.missed_reads,
        }
    }
}

/// Control loop for one MDrive axis
pub struct StepperController<T: LineTransport> {
    transport: T,
    options: ControllerOptions,
    parser: MdriveResponseParser,
    commands: CommandReceiver,
    handle: StepperHandle,
    session: Session,
}

impl<T: LineTransport> StepperController<T> {
    /// Create a controller over an already-open transport
    pub fn new(transport: T, options: ControllerOptions) -> Result<Self> {
        options.validate()?;

        let (sender, commands) = command_channel();
        let handle = StepperHandle {
            commands: sender,
            snapshot: thread_safe_rw(StepperSnapshot::new()),
            terminate: shared_flag(false),
        };

        Ok(Self {
            transport,
            options,
            parser: MdriveResponseParser::new(),
            commands,
            handle,
            session: Session::default(),
        })
    }

    /// Get a handle for queueing commands and reading state
    pub fn handle(&self) -> StepperHandle {
        self.handle.clone()
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Send the startup program
    ///
    /// Commands are fire-and-forget: nothing is read back, and the loop
    /// moves on to polling once every command has been written.
    pub fn initialize(&mut self) -> Result<()> {
        thread::sleep(self.options.startup_delay);
        for command in self.options.startup_program.commands() {
            write_command(&mut self.transport, command, self.options.debug)?;
            thread::sleep(self.options.settle_delay);
        }
        thread::sleep(self.options.ready_delay);

        self.session.phase = ControllerPhase::Running;
        self.handle.publish(self.session.snapshot());
        tracing::info!("Stepper ready on {}", self.transport.name());
        Ok(())
    }

    /// Run one steady-state iteration
    ///
    /// A queued command takes the whole iteration: the firmware echoes it,
    /// and polling in the same cycle could mistake that echo for a reply.
    pub fn run_iteration(&mut self) -> Result<()> {
        if let Some(command) = self.commands.try_dequeue() {
            return write_command(&mut self.transport, &command, self.options.debug);
        }

        for step in self.options.poll_program.steps() {
            match step {
                PollStep::Send(command) => {
                    write_command(&mut self.transport, command, self.options.debug)?;
                }
                PollStep::Read => {
                    let sample = read_until_valid(
                        &mut self.transport,
                        &self.parser,
                        self.options.max_read_attempts,
                        self.options.debug,
                    )?;
                    match sample {
                        Some(sample) => {
                            if let Some(command) = self.session.apply(sample) {
                                self.handle.enqueue_command(command);
                            }
                        }
                        None => {
                            self.session.missed_reads += 1;
                            tracing::debug!(
                                "No position reply after {} lines",
                                self.options.max_read_attempts
                            );
                        }
                    }
                    self.handle.publish(self.session.snapshot());
                }
            }
        }
        Ok(())
    }

    /// Run the startup program, then iterate until termination is requested
    ///
    /// Transport errors end the loop and are returned to the caller; the
    /// published phase is `Terminated` either way.
    pub fn run(&mut self) -> Result<()> {
        let result = self.initialize().and_then(|()| self.steady_state());

        self.session.phase = ControllerPhase::Terminated;
        self.handle.publish(self.session.snapshot());
        match &result {
            Ok(()) => tracing::info!("Stepper loop stopped"),
            Err(e) => tracing::error!("Stepper loop failed: {}", e),
        }
        result
    }

    fn steady_state(&mut self) -> Result<()> {
        while !self.handle.is_terminate_requested() {
            self.run_iteration()?;
        }
        Ok(())
    }
}

impl<T: LineTransport + 'static> StepperController<T> {
    /// Run the loop on a dedicated thread
    pub fn spawn(mut self) -> Result<JoinHandle<Result<()>>> {
        thread::Builder::new()
            .name("stepper-loop".to_string())
            .spawn(move || self.run())
            .map_err(Error::Io)
    }
}

fn write_command<T: LineTransport + ?Sized>(
    transport: &mut T,
    command: &str,
    debug: bool,
) -> Result<()> {
    if debug {
        tracing::debug!("tx: {}", command);
    }
    transport.write_line(command)
}
