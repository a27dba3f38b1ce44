use std::{
    collections::VecDeque,
    hint,
    io::{self, Read, Write},
};

use log::trace;
use thiserror::Error;

use crate::config::LINE_TERMINATOR;

const READ_CHUNK: usize = 64;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed by peer")]
    Closed,
    #[error("read from empty channel")]
    Empty,
    #[error("no serial port available")]
    NoPort,
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("Channel IO Error: {0}")]
    Io(#[from] io::Error),
}

/// Byte-oriented link the protocol runs on.
///
/// `read` and `peek` are only meaningful once `available` reports at least one byte;
/// use the blocking variants to wait for that.
pub trait ByteChannel {
    /// Number of bytes that can be read without waiting.
    fn available(&mut self) -> Result<usize, ChannelError>;

    /// Consumes the next byte.
    fn read(&mut self) -> Result<u8, ChannelError>;

    /// Returns the next byte without consuming it.
    fn peek(&mut self) -> Result<u8, ChannelError>;

    /// Emits a line terminator.
    fn write_line(&mut self) -> Result<(), ChannelError>;

    /// Spins until a byte is available. There is no timeout.
    fn await_byte(&mut self) -> Result<(), ChannelError> {
        while self.available()? < 1 {
            hint::spin_loop();
        }
        Ok(())
    }

    fn read_blocking(&mut self) -> Result<u8, ChannelError> {
        self.await_byte()?;
        self.read()
    }

    fn peek_blocking(&mut self) -> Result<u8, ChannelError> {
        self.await_byte()?;
        self.peek()
    }
}

/// [`ByteChannel`] over any blocking stream, such as a serial port or a pipe.
///
/// `available` pulls a single read from the stream whenever the local buffer is empty.
/// A read that times out counts as nothing available yet.
pub struct StreamChannel<T: Read + Write> {
    stream: T,
    buffer: VecDeque<u8>,
}

impl<T: Read + Write> StreamChannel<T> {
    pub fn new(stream: T) -> Self {
        Self {
            stream,
            buffer: VecDeque::with_capacity(READ_CHUNK),
        }
    }

    pub fn into_inner(self) -> T {
        self.stream
    }

    fn fill(&mut self) -> Result<(), ChannelError> {
        let mut chunk = [0u8; READ_CHUNK];
        let n = loop {
            match self.stream.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        };

        if n == 0 {
            return Err(ChannelError::Closed);
        }
        trace!("buffered {n} bytes from stream");
        self.buffer.extend(&chunk[..n]);
        Ok(())
    }
}

impl<T: Read + Write> ByteChannel for StreamChannel<T> {
    fn available(&mut self) -> Result<usize, ChannelError> {
        if self.buffer.is_empty() {
            self.fill()?;
        }
        Ok(self.buffer.len())
    }

    fn read(&mut self) -> Result<u8, ChannelError> {
        self.buffer.pop_front().ok_or(ChannelError::Empty)
    }

    fn peek(&mut self) -> Result<u8, ChannelError> {
        self.buffer.front().copied().ok_or(ChannelError::Empty)
    }

    fn write_line(&mut self) -> Result<(), ChannelError> {
        self.stream.write_all(LINE_TERMINATOR)?;
        self.stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn stream_channel_peek_does_not_consume() {
        let mut channel = StreamChannel::new(Cursor::new(vec![7u8, 8]));

        assert_eq!(channel.peek_blocking().unwrap(), 7);
        assert_eq!(channel.peek_blocking().unwrap(), 7);
        assert_eq!(channel.read_blocking().unwrap(), 7);
        assert_eq!(channel.read_blocking().unwrap(), 8);
    }

    #[test]
    #[should_panic(expected = "Closed")]
    fn stream_channel_reports_end_of_stream() {
        let mut channel = StreamChannel::new(Cursor::new(vec![1u8]));

        channel.read_blocking().unwrap();
        channel.read_blocking().unwrap();
    }

    #[test]
    #[should_panic(expected = "Empty")]
    fn read_without_available_byte() {
        let mut channel = StreamChannel::new(Cursor::new(Vec::<u8>::new()));
        channel.read().unwrap();
    }

    #[test]
    fn stream_channel_writes_terminator() {
        let mut channel = StreamChannel::new(Cursor::new(Vec::<u8>::new()));
        channel.write_line().unwrap();

        assert_eq!(channel.into_inner().into_inner(), b"\r\n");
    }

    /// Stream that times out a few times before handing over its data.
    struct SlowStream {
        timeouts: usize,
        data: Cursor<Vec<u8>>,
    }

    impl Read for SlowStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.timeouts > 0 {
                self.timeouts -= 1;
                return Err(io::ErrorKind::TimedOut.into());
            }
            self.data.read(buf)
        }
    }

    impl Write for SlowStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_timeout_means_nothing_available() {
        let mut channel = StreamChannel::new(SlowStream {
            timeouts: 3,
            data: Cursor::new(vec![0xFF]),
        });

        assert_eq!(channel.available().unwrap(), 0);
        assert_eq!(channel.read_blocking().unwrap(), 0xFF);
    }
}
