use std::io::{self, Read, Write};

use log::{debug, info, trace};
use thiserror::Error;

use crate::{Command, config::Configuration};

use super::codec::{EncodeError, encode_batch, encode_handshake};

#[derive(Debug, Error)]
pub enum MasterError {
    #[error("no protocol configured, run setup first")]
    NotConfigured,
    #[error("client closed the link while an acknowledgment was pending")]
    Closed,
    #[error("failed to encode batch: {0}")]
    Encode(#[from] EncodeError),
    #[error("Master IO Error: {0}")]
    Io(#[from] io::Error),
}

/// Host side of the link.
///
/// Writes handshake and batch frames to the client and waits for the line it sends back
/// after each one.
pub struct SerialMaster<T: Read + Write> {
    stream: T,
    config: Option<Configuration>,
}

impl<T: Read + Write> SerialMaster<T> {
    pub fn new(stream: T) -> Self {
        Self {
            stream,
            config: None,
        }
    }

    pub fn configuration(&self) -> Option<Configuration> {
        self.config
    }

    pub fn into_inner(self) -> T {
        self.stream
    }

    /// Sends a handshake frame and adopts `config` once the client acknowledges it.
    pub fn setup(&mut self, config: Configuration) -> Result<(), MasterError> {
        self.stream.write_all(&encode_handshake(&config))?;
        self.stream.flush()?;
        self.await_ack()?;

        info!("client configured: {config}");
        self.config = Some(config);
        Ok(())
    }

    /// Sends between one and `batch_size` commands as a single batch. Unused slots are
    /// filled with zeroed commands.
    pub fn send(&mut self, commands: &[Command]) -> Result<(), MasterError> {
        let config = self.config.ok_or(MasterError::NotConfigured)?;
        let frame = encode_batch(&config, commands)?;

        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        debug!("sent batch of {} command(s)", commands.len());
        self.await_ack()
    }

    fn await_ack(&mut self) -> Result<(), MasterError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(MasterError::Closed),
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        trace!("acknowledged: {:?}", String::from_utf8_lossy(&line));
        Ok(())
    }
}
