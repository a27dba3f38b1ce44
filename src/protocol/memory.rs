use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use super::transport::{ByteChannel, ChannelError};
use crate::config::LINE_TERMINATOR;

#[derive(Debug, Default)]
struct Inner {
    incoming: VecDeque<u8>,
    outgoing: Vec<u8>,
}

/// In-memory [`ByteChannel`].
///
/// Clones share the same buffers, so one handle can be given to an engine while
/// another feeds bytes to it, possibly from a different thread.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel with `bytes` already waiting to be read.
    pub fn with_incoming(bytes: &[u8]) -> Self {
        let channel = Self::new();
        channel.push(bytes);
        channel
    }

    /// Makes `bytes` available to the reading side.
    pub fn push(&self, bytes: &[u8]) {
        self.lock().incoming.extend(bytes);
    }

    /// Everything written to the channel so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().outgoing.clone()
    }

    /// Bytes not yet consumed by the reading side.
    pub fn pending(&self) -> Vec<u8> {
        self.lock().incoming.iter().copied().collect()
    }

    // A poisoned lock only means a feeding thread panicked; the buffers are still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ByteChannel for MemoryChannel {
    fn available(&mut self) -> Result<usize, ChannelError> {
        Ok(self.lock().incoming.len())
    }

    fn read(&mut self) -> Result<u8, ChannelError> {
        self.lock().incoming.pop_front().ok_or(ChannelError::Empty)
    }

    fn peek(&mut self) -> Result<u8, ChannelError> {
        self.lock()
            .incoming
            .front()
            .copied()
            .ok_or(ChannelError::Empty)
    }

    fn write_line(&mut self) -> Result<(), ChannelError> {
        self.lock().outgoing.extend_from_slice(LINE_TERMINATOR);
        Ok(())
    }
}
