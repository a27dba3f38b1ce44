//! Command records sent by the master.
//!
//! A [`Command`] is one slot of a batch: an operation id byte followed by exactly
//! `message length` integer parameters. What the id means is up to the application
//! running on the client; the protocol only carries it.
//!
//! Any id byte is accepted here. Only the first slot of a batch may not use the setup
//! byte, which [`encode_batch`](crate::protocol::encode_batch) checks.
//!
//! Commands can be parsed from whitespace separated text, the id first:
//!
//! # Example
//! ```rust
//! use batchlink::Command;
//!
//! let cmd: Command = "55 12 -14 1500".try_into().unwrap();
//! assert_eq!(cmd, Command::new(55, vec![12, -14, 1500]));
//! ```
use thiserror::Error;

/// List of possible errors when parsing a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid command id '{0}', expected 0 to 255")]
    InvalidId(String),

    #[error("invalid parameter '{0}', expected an integer")]
    InvalidParameter(String),

    #[error("no command provided")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: u8,
    pub params: Vec<i32>,
}

impl Command {
    pub fn new(id: u8, params: Vec<i32>) -> Self {
        Self { id, params }
    }
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut parts = value.split_whitespace();

        let id = parts.next().ok_or(CommandError::Empty)?;
        let id = id
            .parse::<u8>()
            .map_err(|_| CommandError::InvalidId(id.to_string()))?;

        let params = parts
            .map(|p| {
                p.parse::<i32>()
                    .map_err(|_| CommandError::InvalidParameter(p.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Command { id, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_from_string() {
        let inputs = vec![
            ("1", Command::new(1, vec![])),
            ("2 1500 2300 -1400", Command::new(2, vec![1500, 2300, -1400])),
            ("  0   0 0 ", Command::new(0, vec![0, 0])),
            ("255 -1", Command::new(255, vec![-1])),
        ];

        for (cmd, expected) in inputs {
            let command: Command = cmd.try_into().unwrap();
            assert_eq!(command, expected);
        }
    }

    #[test]
    fn command_parse_errors() {
        assert_eq!(Command::try_from(""), Err(CommandError::Empty));
        assert_eq!(
            Command::try_from("256 1"),
            Err(CommandError::InvalidId("256".into()))
        );
        assert_eq!(
            Command::try_from("move 1"),
            Err(CommandError::InvalidId("move".into()))
        );
        assert_eq!(
            Command::try_from("3 1.5"),
            Err(CommandError::InvalidParameter("1.5".into()))
        );
    }
}
