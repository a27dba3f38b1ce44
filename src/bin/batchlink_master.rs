use std::{error::Error, io, thread};

use batchlink::{
    Command, Configuration, Input, SerialMaster,
    config::SETTLE_DELAY,
    prompt,
    protocol::{list_ports, open_port, resolve_port},
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Serial port the client is attached to; the first available port if omitted
    device: Option<String>,
    /// Bytes per integer parameter (1, 2 or 4)
    #[arg(long, default_value_t = 2)]
    width: u8,
    /// Parameters per command
    #[arg(long, default_value_t = 6)]
    length: u8,
    /// Commands per batch
    #[arg(long, default_value_t = 1)]
    batch: u8,
    /// Print the available serial ports and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    if cli.list {
        let ports = list_ports()?;
        println!("Available devices: {}", ports.len());
        for port in ports {
            println!("- {}", port.port_name);
        }
        return Ok(());
    }

    let config = Configuration::new(cli.width, cli.length, cli.batch)?;
    let port = resolve_port(cli.device.as_deref())?;
    let mut master = SerialMaster::new(open_port(&port)?);

    // Opening the port resets most boards.
    thread::sleep(SETTLE_DELAY);
    master.setup(config)?;

    let stdin = io::stdin();
    let mut queued: Vec<Command> = Vec::with_capacity(config.batch_size() as usize);

    loop {
        let input = match prompt(stdin.lock(), io::stdout().lock()) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        match input {
            Input::Exit => break,
            Input::Flush => {}
            Input::Command(cmd) => {
                if cmd.params.len() != config.message_length() as usize {
                    eprintln!(
                        "error: expected {} parameter(s), got {}",
                        config.message_length(),
                        cmd.params.len()
                    );
                    continue;
                }
                queued.push(cmd);
                if queued.len() < config.batch_size() as usize {
                    continue;
                }
            }
        }

        if !queued.is_empty() {
            if let Err(e) = master.send(&queued) {
                eprintln!("send error: {e}");
            }
            queued.clear();
        }
    }

    if !queued.is_empty() {
        master.send(&queued)?;
    }

    Ok(())
}
