//! Serial batch protocol.
//!
//! This module implements both ends of a small framing protocol used to push batches of
//! fixed-width integers from a host (the master) to a microcontroller (the client) over a
//! byte-oriented serial link.
//!
//! # Overview
//!
//! A session starts with a setup handshake in which the master declares the integer width,
//! the number of parameters per command and the number of commands per batch. From then on
//! every frame is a batch, decoded purely by position using the negotiated values. The
//! client acknowledges each handshake and batch with a line terminator.
//!
//! # Key Components
//!
//! - [`ProtocolEngine`]: Client state machine; runs handshakes and decodes batches.
//! - [`SerialMaster`]: Host side; encodes frames and waits for acknowledgments.
//! - [`ByteChannel`]: Byte transport the engine reads from, with [`StreamChannel`] and
//!   [`MemoryChannel`] implementations.
//! - [`open_device`] / [`resolve_port`]: Raw serial ports at [`BAUD_RATE`].
//!
//! [`BAUD_RATE`]: crate::config::BAUD_RATE
//!
//! # Binary Format
//!
//! - Handshake: `[0xFF][width][message length][batch size]`, width being 1, 2 or 4.
//! - Batch: `batch size` records of `[command][message length × width bytes]`.
//! - Parameters are two's-complement and big-endian.
//! - No length prefix or checksum; the link is assumed to be reliable.
//!
//! A setup byte (`0xFF`) found where a batch should start is read as a new handshake, so
//! the master can renegotiate at any batch boundary.
//!
//! # See Also
//!
//! - [`config`](crate::config): Negotiated parameters and protocol constants.
mod batch;
mod codec;
mod engine;
mod master;
mod memory;
mod port;
mod transport;

pub use batch::Batch;
pub use codec::{EncodeError, decode_int, encode_batch, encode_handshake, encode_int, encode_params};
pub use engine::{HandshakeOutcome, ProtocolEngine, ProtocolError, Received};
pub use master::{MasterError, SerialMaster};
pub use memory::MemoryChannel;
pub use port::{list_ports, open_device, open_port, resolve_port, select_port};
pub use transport::{ByteChannel, ChannelError, StreamChannel};
