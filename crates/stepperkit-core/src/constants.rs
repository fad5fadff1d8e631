//! Firmware and link constants for MDrive-style stepper controllers.

/// Default serial baud rate used by the controller
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Line terminator appended to every outbound command
pub const LINE_ENDING: &str = "\r";

/// Default serial read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Number of lines read while looking for a position/status reply
pub const MAX_READ_ATTEMPTS: u32 = 5;

/// Delay before the first startup command, in milliseconds
pub const STARTUP_DELAY_MS: u64 = 100;

/// Delay after each startup command, in milliseconds
pub const SETTLE_DELAY_MS: u64 = 1000;

/// Delay after the last startup command, in milliseconds
pub const READY_DELAY_MS: u64 = 1000;

/// Status code reported while the axis is idle or moving normally
pub const STATUS_NORMAL: i32 = 0;

/// Status code reported when the upper (+) limit switch is asserted
pub const STATUS_UPPER_LIMIT: i32 = 83;

/// Status code reported when the lower (-) limit switch is asserted
pub const STATUS_LOWER_LIMIT: i32 = 84;

/// Clears the firmware error latch
pub const CLEAR_ERROR_COMMAND: &str = "ER 0";

/// Prints position counter, a space, then the error code
pub const POSITION_QUERY_COMMAND: &str = "PR C1 \" \" ER";

/// Factory startup program: (command, description)
pub const DEFAULT_STARTUP_COMMANDS: &[(&str, &str)] = &[
    ("FD", "reset to factory defaults"),
    ("MS=16", "16 microsteps per step"),
    ("A=50000", "acceleration in steps/sec^2"),
    ("VA SP=12800", "create speed variable in steps/sec"),
    ("VM=12800", "maximum velocity in steps/sec"),
    ("RC=85", "run current in percent"),
    ("S1=3,1", "enable minus limit switch for homing"),
    ("S2=2,1", "enable plus limit switch for homing"),
];
