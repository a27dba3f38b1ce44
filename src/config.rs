//! Negotiated framing parameters.
//!
//! A [`Configuration`] is the triple agreed on during the setup handshake: how many bytes
//! make up one integer, how many integers follow each command and how many commands make
//! up one batch. The type can only hold valid values, so an engine that has not completed
//! a handshake simply has no configuration at all.
use std::{fmt, num::NonZeroU8, time::Duration};

use thiserror::Error;

/// Reserved byte that opens every handshake frame.
pub const SETUP_INIT_BYTE: u8 = 0xFF;

/// Symbol rate serial ports are opened at.
pub const BAUD_RATE: u32 = 115_200;

/// How long a blocking read on a serial port waits before reporting no data.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Boards that reset when the port opens need this long before they listen.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Acknowledgment written by the client after each handshake and batch.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Reasons a handshake frame is refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeRejection {
    #[error("expected setup byte 0xFF, got 0x{0:02X}")]
    Marker(u8),

    #[error("unsupported integer width {0}, expected 1, 2 or 4")]
    IntWidth(u8),

    #[error("message length must be at least 1")]
    MessageLength,

    #[error("batch size must be at least 1")]
    BatchSize,
}

/// Number of bytes used to transfer a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    One,
    Two,
    Four,
}

impl IntWidth {
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::One => 1,
            IntWidth::Two => 2,
            IntWidth::Four => 4,
        }
    }

    /// Smallest value representable in this width.
    pub fn min_value(self) -> i64 {
        -(1i64 << (8 * self.bytes() - 1))
    }

    /// Largest value representable in this width.
    pub fn max_value(self) -> i64 {
        (1i64 << (8 * self.bytes() - 1)) - 1
    }
}

impl TryFrom<u8> for IntWidth {
    type Error = HandshakeRejection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IntWidth::One),
            2 => Ok(IntWidth::Two),
            4 => Ok(IntWidth::Four),
            w => Err(HandshakeRejection::IntWidth(w)),
        }
    }
}

impl From<IntWidth> for u8 {
    fn from(value: IntWidth) -> Self {
        value.bytes() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    int_width: IntWidth,
    message_length: NonZeroU8,
    batch_size: NonZeroU8,
}

impl Configuration {
    /// Validates a raw triple in handshake order: width, then length, then batch size.
    pub fn new(
        int_width: u8,
        message_length: u8,
        batch_size: u8,
    ) -> Result<Self, HandshakeRejection> {
        let int_width = IntWidth::try_from(int_width)?;
        let message_length =
            NonZeroU8::new(message_length).ok_or(HandshakeRejection::MessageLength)?;
        let batch_size = NonZeroU8::new(batch_size).ok_or(HandshakeRejection::BatchSize)?;

        Ok(Self {
            int_width,
            message_length,
            batch_size,
        })
    }

    pub fn int_width(&self) -> IntWidth {
        self.int_width
    }

    pub fn message_length(&self) -> u8 {
        self.message_length.get()
    }

    pub fn batch_size(&self) -> u8 {
        self.batch_size.get()
    }

    /// Bytes occupied by one command and its parameters.
    pub fn record_len(&self) -> usize {
        1 + self.message_length() as usize * self.int_width.bytes()
    }

    /// Bytes occupied by a whole batch frame.
    pub fn batch_len(&self) -> usize {
        self.batch_size() as usize * self.record_len()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width={} length={} batch={}",
            self.int_width.bytes(),
            self.message_length(),
            self.batch_size()
        )
    }
}
