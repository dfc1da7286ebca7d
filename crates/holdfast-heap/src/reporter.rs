//! Pluggable sinks for registry diagnostics.
//!
//! The surrounding runtime decides how misuse and leaks are shown to a
//! user. The registry only needs somewhere to send a [`HeapError`]. With no
//! reporter installed, messages go to the `log` facade.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::error::HeapError;

/// Receives registry diagnostics.
///
/// Called without any registry lock held, so implementations may call back
/// into the registry.
pub trait ErrorReporter: Send + Sync {
    /// Deliver one diagnostic.
    fn report(&self, error: &HeapError);
}

impl<F> ErrorReporter for F
where
    F: Fn(&HeapError) + Send + Sync,
{
    fn report(&self, error: &HeapError) {
        self(error)
    }
}

/// Writes every diagnostic to the `log` facade at error level.
///
/// This is what the registry does when no reporter is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &HeapError) {
        log::error!("holdfast: {error}");
    }
}

/// Forwards diagnostics into a bounded channel.
///
/// Never blocks the reporting thread: when the queue is full the message is
/// dropped and a warning is logged instead.
#[derive(Clone, Debug)]
pub struct ChannelReporter {
    tx: Sender<HeapError>,
}

impl ChannelReporter {
    /// Default queue capacity.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a reporter and the receiving end of its queue.
    pub fn new() -> (Self, Receiver<HeapError>) {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a reporter whose queue holds at most `capacity` messages.
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<HeapError>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }
}

impl ErrorReporter for ChannelReporter {
    fn report(&self, error: &HeapError) {
        match self.tx.try_send(error.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                log::warn!("holdfast: report queue full, dropping: {dropped}");
            }
            Err(TrySendError::Disconnected(dropped)) => {
                log::warn!("holdfast: report receiver gone, dropping: {dropped}");
            }
        }
    }
}
