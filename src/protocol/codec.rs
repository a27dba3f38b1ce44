//! Byte-level encoding of handshake and batch frames.
//!
//! Parameters travel as two's-complement integers of the negotiated width, most
//! significant byte first. The client assembles them back with sign extension, so any
//! value that fits the width survives the trip unchanged.
use thiserror::Error;

use crate::{
    Command,
    config::{Configuration, IntWidth, SETUP_INIT_BYTE},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("value {value} does not fit in {width} byte(s)")]
    OutOfRange { value: i64, width: usize },

    #[error("batch holds {given} command(s), expected 1 to {max}")]
    BatchSize { given: usize, max: u8 },

    #[error("command {index} has {given} parameter(s), expected {expected}")]
    MessageLength {
        index: usize,
        given: usize,
        expected: u8,
    },

    #[error("command 0x{0:02X} is reserved for the setup handshake")]
    ReservedCommand(u8),
}

/// Splits `value` into `width` big-endian two's-complement bytes.
pub fn encode_int(value: i64, width: IntWidth) -> Result<Vec<u8>, EncodeError> {
    if value < width.min_value() || value > width.max_value() {
        return Err(EncodeError::OutOfRange {
            value,
            width: width.bytes(),
        });
    }

    let bytes = value.to_be_bytes();
    Ok(bytes[bytes.len() - width.bytes()..].to_vec())
}

pub fn encode_params(values: &[i32], width: IntWidth) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(values.len() * width.bytes());
    for value in values {
        out.extend(encode_int(*value as i64, width)?);
    }
    Ok(out)
}

/// Assembles the first `width` bytes of `buf`, big-endian, into a signed integer,
/// extending the sign bit of the first byte.
pub fn decode_int(buf: &[u8; 4], width: IntWidth) -> i32 {
    let mut value: u32 = 0;
    for byte in &buf[..width.bytes()] {
        value = (value << 8) | *byte as u32;
    }

    let shift = 32 - 8 * width.bytes() as u32;
    ((value << shift) as i32) >> shift
}

pub fn encode_handshake(config: &Configuration) -> [u8; 4] {
    [
        SETUP_INIT_BYTE,
        config.int_width().into(),
        config.message_length(),
        config.batch_size(),
    ]
}

/// Encodes up to `batch_size` commands, padding the remaining slots with zeroed commands.
pub fn encode_batch(config: &Configuration, commands: &[Command]) -> Result<Vec<u8>, EncodeError> {
    let max = config.batch_size();
    if commands.is_empty() || commands.len() > max as usize {
        return Err(EncodeError::BatchSize {
            given: commands.len(),
            max,
        });
    }
    if commands[0].id == SETUP_INIT_BYTE {
        return Err(EncodeError::ReservedCommand(SETUP_INIT_BYTE));
    }

    let expected = config.message_length();
    let mut out = Vec::with_capacity(config.batch_len());
    for (index, command) in commands.iter().enumerate() {
        if command.params.len() != expected as usize {
            return Err(EncodeError::MessageLength {
                index,
                given: command.params.len(),
                expected,
            });
        }
        out.push(command.id);
        out.extend(encode_params(&command.params, config.int_width())?);
    }
    out.resize(config.batch_len(), 0);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_two_byte_values() {
        assert_eq!(encode_int(256, IntWidth::Two).unwrap(), vec![1, 0]);
        assert_eq!(encode_int(1234, IntWidth::Two).unwrap(), vec![4, 210]);
        assert_eq!(encode_int(-1, IntWidth::Two).unwrap(), vec![255, 255]);
        assert_eq!(encode_int(-32768, IntWidth::Two).unwrap(), vec![128, 0]);
        assert_eq!(encode_int(-128, IntWidth::One).unwrap(), vec![128]);
        assert_eq!(encode_int(0, IntWidth::Four).unwrap(), vec![0; 4]);
    }

    #[test]
    fn rejects_values_outside_width() {
        assert_eq!(
            encode_int(256, IntWidth::One),
            Err(EncodeError::OutOfRange {
                value: 256,
                width: 1
            })
        );
        assert!(encode_int(-34567, IntWidth::Two).is_err());
        assert!(encode_int(32768, IntWidth::Two).is_err());
        assert!(encode_int(i32::MIN as i64, IntWidth::Four).is_ok());
    }

    #[test]
    fn param_stream() {
        let bytes = encode_params(&[256, 1234, -1, -32768], IntWidth::Two).unwrap();
        assert_eq!(bytes, vec![1, 0, 4, 210, 255, 255, 128, 0]);
        assert!(encode_params(&[], IntWidth::Two).unwrap().is_empty());
    }

    #[test]
    fn decodes_with_sign_extension() {
        assert_eq!(decode_int(&[0x00, 0x0A, 0, 0], IntWidth::Two), 10);
        assert_eq!(decode_int(&[0x01, 0x2C, 0, 0], IntWidth::Two), 300);
        assert_eq!(decode_int(&[0xFF, 0xFF, 0, 0], IntWidth::Two), -1);
        assert_eq!(decode_int(&[0x80, 0, 0, 0], IntWidth::One), -128);
        assert_eq!(decode_int(&[0x7F, 0, 0, 0], IntWidth::One), 127);
        assert_eq!(decode_int(&[0x80, 0x00, 0x00, 0x00], IntWidth::Four), i32::MIN);
        assert_eq!(decode_int(&[0x00, 0x01, 0x00, 0x00], IntWidth::Four), 65536);
    }

    #[test]
    fn decode_ignores_bytes_past_width() {
        assert_eq!(decode_int(&[0x05, 0xFF, 0xFF, 0xFF], IntWidth::One), 5);
        assert_eq!(decode_int(&[0xFF, 0xFE, 0x12, 0x34], IntWidth::Two), -2);
    }

    #[test]
    fn handshake_frame() {
        let config = Configuration::new(2, 6, 20).unwrap();
        assert_eq!(encode_handshake(&config), [0xFF, 2, 6, 20]);
    }

    #[test]
    fn batch_is_padded_to_batch_size() {
        let config = Configuration::new(2, 2, 2).unwrap();
        let bytes = encode_batch(&config, &[Command::new(5, vec![10, 300])]).unwrap();

        assert_eq!(bytes, vec![5, 0x00, 0x0A, 0x01, 0x2C, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn setup_byte_allowed_after_first_slot() {
        let config = Configuration::new(1, 1, 2).unwrap();
        let commands = [Command::new(1, vec![0]), Command::new(0xFF, vec![-1])];

        assert_eq!(
            encode_batch(&config, &commands).unwrap(),
            vec![1, 0, 0xFF, 0xFF]
        );
    }

    #[test]
    fn batch_validation() {
        let config = Configuration::new(1, 1, 1).unwrap();

        assert_eq!(
            encode_batch(&config, &[]),
            Err(EncodeError::BatchSize { given: 0, max: 1 })
        );
        assert_eq!(
            encode_batch(&config, &[Command::new(1, vec![1]), Command::new(2, vec![2])]),
            Err(EncodeError::BatchSize { given: 2, max: 1 })
        );
        assert_eq!(
            encode_batch(&config, &[Command::new(1, vec![1, 2])]),
            Err(EncodeError::MessageLength {
                index: 0,
                given: 2,
                expected: 1
            })
        );
        assert_eq!(
            encode_batch(&config, &[Command::new(0xFF, vec![1])]),
            Err(EncodeError::ReservedCommand(0xFF))
        );
    }
}
