use log::{debug, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, StopBits};

use crate::config::{BAUD_RATE, READ_TIMEOUT};

use super::transport::{ChannelError, StreamChannel};

/// Opens `path` as a raw 8N1 serial line at [`BAUD_RATE`].
///
/// Reads give up after [`READ_TIMEOUT`] so callers can poll instead of hanging inside the
/// driver.
pub fn open_port(path: &str) -> Result<Box<dyn SerialPort>, ChannelError> {
    let port = serialport::new(path, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()?;

    info!("connected to {path} @ {BAUD_RATE} baud");
    Ok(port)
}

/// Opens a serial port as a [`ByteChannel`](super::ByteChannel).
pub fn open_device(path: &str) -> Result<StreamChannel<Box<dyn SerialPort>>, ChannelError> {
    Ok(StreamChannel::new(open_port(path)?))
}

/// Serial ports currently present on this machine.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, ChannelError> {
    let ports = serialport::available_ports()?;
    for port in &ports {
        debug!("found port {} ({:?})", port.port_name, port.port_type);
    }
    Ok(ports)
}

/// Picks the port to connect to: the requested one if given, else the first available.
pub fn select_port(
    requested: Option<&str>,
    available: &[SerialPortInfo],
) -> Result<String, ChannelError> {
    match requested {
        Some(name) => Ok(name.to_string()),
        None => available
            .first()
            .map(|p| p.port_name.clone())
            .ok_or(ChannelError::NoPort),
    }
}

/// Resolves the port with [`select_port`], only enumerating ports when none was requested.
pub fn resolve_port(requested: Option<&str>) -> Result<String, ChannelError> {
    if requested.is_some() {
        return select_port(requested, &[]);
    }
    select_port(None, &list_ports()?)
}
