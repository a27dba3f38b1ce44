pub mod cli;
pub mod command;
pub mod config;
pub mod protocol;

pub use cli::{Input, prompt};
pub use command::Command;
pub use config::Configuration;
pub use protocol::{ProtocolEngine, Received, SerialMaster};
