use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::config::{Configuration, HandshakeRejection, IntWidth, SETUP_INIT_BYTE};

use super::{
    batch::Batch,
    codec::decode_int,
    transport::{ByteChannel, ChannelError},
};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("no protocol configured, a setup handshake must succeed first")]
    Unconfigured,
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Result of reading a handshake frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Accepted(Configuration),
    Rejected(HandshakeRejection),
}

impl HandshakeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, HandshakeOutcome::Accepted(_))
    }
}

/// Result of a single [`ProtocolEngine::receive_batch`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Batch(Batch),
    /// A handshake frame arrived instead of a batch and was processed.
    Renegotiated(HandshakeOutcome),
}

/// Client side of the link: negotiates framing and decodes incoming batches.
pub struct ProtocolEngine<C: ByteChannel> {
    channel: C,
    config: Option<Configuration>,
}

impl<C: ByteChannel> ProtocolEngine<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            config: None,
        }
    }

    /// Reads a four byte handshake frame: marker, integer width, message length and
    /// batch size. Each byte is checked before the next one is consumed; on the first
    /// invalid byte the frame is rejected and the current configuration is kept.
    pub fn run_setup_handshake(&mut self) -> Result<HandshakeOutcome, ChannelError> {
        let marker = self.channel.read_blocking()?;
        if marker != SETUP_INIT_BYTE {
            return Ok(self.reject(HandshakeRejection::Marker(marker)));
        }

        let width = self.channel.read_blocking()?;
        let int_width = match IntWidth::try_from(width) {
            Ok(w) => w,
            Err(rejection) => return Ok(self.reject(rejection)),
        };

        let message_length = self.channel.read_blocking()?;
        if message_length < 1 {
            return Ok(self.reject(HandshakeRejection::MessageLength));
        }

        let batch_size = self.channel.read_blocking()?;
        let config = match Configuration::new(int_width.into(), message_length, batch_size) {
            Ok(config) => config,
            Err(rejection) => return Ok(self.reject(rejection)),
        };

        self.channel.write_line()?;
        self.config = Some(config);
        info!("protocol configured: {config}");

        Ok(HandshakeOutcome::Accepted(config))
    }

    /// Decodes the next batch frame, or processes a handshake if the next byte is the
    /// setup marker.
    pub fn receive_batch(&mut self) -> Result<Received, ProtocolError> {
        let config = self.config.ok_or(ProtocolError::Unconfigured)?;

        if self.channel.peek_blocking()? == SETUP_INIT_BYTE {
            debug!("setup byte received, renegotiating");
            let outcome = self.run_setup_handshake()?;
            return Ok(Received::Renegotiated(outcome));
        }

        let int_width = config.int_width();
        let width = int_width.bytes();
        let message_length = config.message_length() as usize;
        let mut batch = Batch::with_capacity(config.batch_size() as usize, message_length);
        let mut buf = [0u8; 4];

        for _ in 0..config.batch_size() {
            let command = self.channel.read_blocking()?;
            trace!("command {command}");
            batch.push_command(command);

            for _ in 0..message_length {
                for byte in buf.iter_mut().take(width) {
                    *byte = self.channel.read_blocking()?;
                }
                batch.push_param(decode_int(&buf, int_width));
            }
        }

        self.channel.write_line()?;
        debug!("received batch of {} command(s)", batch.len());

        Ok(Received::Batch(batch))
    }

    pub fn int_width(&self) -> u8 {
        self.config.map_or(0, |c| c.int_width().into())
    }

    pub fn message_length(&self) -> u8 {
        self.config.map_or(0, |c| c.message_length())
    }

    pub fn batch_size(&self) -> u8 {
        self.config.map_or(0, |c| c.batch_size())
    }

    pub fn configuration(&self) -> Option<Configuration> {
        self.config
    }

    /// Whether a handshake has succeeded and batches may be received.
    pub fn protocol_defined(&self) -> bool {
        self.config.is_some()
    }

    fn reject(&self, rejection: HandshakeRejection) -> HandshakeOutcome {
        warn!("handshake rejected: {rejection}");
        HandshakeOutcome::Rejected(rejection)
    }
}
