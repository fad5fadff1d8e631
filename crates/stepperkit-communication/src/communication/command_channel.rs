//! Outbound command queue
//!
//! An unbounded multi-producer, single-consumer FIFO of command lines.
//! Any number of callers (and the control loop itself) enqueue; only the
//! control loop dequeues, and it never blocks doing so.

use tokio::sync::mpsc;

/// Create a connected sender/receiver pair
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Producer side of the command queue
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<String>,
}

impl CommandSender {
    /// Append a command to the tail of the queue
    ///
    /// Never blocks. If the control loop has already gone away the command
    /// can never be delivered, so it is dropped with a warning.
    pub fn enqueue(&self, command: impl Into<String>) {
        if let Err(e) = self.tx.send(command.into()) {
            tracing::warn!("Dropping command '{}': control loop has stopped", e.0);
        }
    }

    /// Check if the receiving side has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the command queue
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl CommandReceiver {
    /// Pop the head of the queue without blocking
    pub fn try_dequeue(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}
