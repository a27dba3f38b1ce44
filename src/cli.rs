//! CLI utilities for batchlink.
//!
//! The utilities present in this module can be used to drive a [`SerialMaster`] from
//! line-based input.
//!
//! [`SerialMaster`]: crate::protocol::SerialMaster
use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::command::{Command, CommandError};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Prompt IO Error: {0}")]
    Io(#[from] io::Error),
}

/// Possible inputs from a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Exit command `.exit`, also produced at end of input
    Exit,
    /// Send queued commands now `.flush`
    Flush,
    /// Command record to queue for the next batch
    Command(Command),
}

/// Prompt user for a valid input line.
pub fn prompt<R, W>(mut reader: R, mut writer: W) -> Result<Input, PromptError>
where
    R: BufRead,
    W: Write,
{
    let mut s = String::default();
    write!(&mut writer, "> ")?;
    writer.flush()?;

    if reader.read_line(&mut s)? == 0 {
        return Ok(Input::Exit);
    }

    match s.trim() {
        ".exit" => Ok(Input::Exit),
        ".flush" => Ok(Input::Flush),
        s => Ok(Input::Command(s.try_into()?)),
    }
}
