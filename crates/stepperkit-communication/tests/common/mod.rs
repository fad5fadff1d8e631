//! Scripted transport shared by the controller tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use stepperkit_communication::LineTransport;
use stepperkit_core::{ConnectionError, Result};

/// In-memory transport that records writes and replays canned replies
///
/// Once the scripted replies run out, `read_line` returns the default reply
/// (empty unless set).
pub struct MockTransport {
    sent: Arc<Mutex<Vec<String>>>,
    replies: VecDeque<String>,
    default_reply: String,
    fail_on_write: Option<usize>,
    reads: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            replies: VecDeque::new(),
            default_reply: String::new(),
            fail_on_write: None,
            reads: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies.extend(replies.into_iter().map(Into::into));
        self
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Fail the write with this 0-based index
    pub fn failing_on_write(mut self, index: usize) -> Self {
        self.fail_on_write = Some(index);
        self
    }

    /// Shared log of every line written
    pub fn sent_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }

    pub fn read_count(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.reads)
    }
}

impl LineTransport for MockTransport {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut sent = self.sent.lock();
        if self.fail_on_write == Some(sent.len()) {
            return Err(ConnectionError::ConnectionLost {
                reason: "cable unplugged".to_string(),
            }
            .into());
        }
        sent.push(line.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        *self.reads.lock() += 1;
        Ok(self
            .replies
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone()))
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        self.replies.clear();
        Ok(())
    }

    fn reset_output_buffer(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}
