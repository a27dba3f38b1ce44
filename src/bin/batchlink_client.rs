use std::{
    error::Error,
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use batchlink::{
    ProtocolEngine, Received,
    protocol::{open_device, resolve_port},
};
use clap::Parser;
use log::{info, warn};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Serial port to listen on; the first available port if omitted
    device: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let running = Arc::new(AtomicBool::new(true));
    let handle = Arc::clone(&running);
    // First interrupt stops after the current batch, a second one exits immediately.
    ctrlc::set_handler(move || {
        if !handle.swap(false, Ordering::SeqCst) {
            process::exit(130);
        }
    })?;

    let port = resolve_port(cli.device.as_deref())?;
    let mut engine = ProtocolEngine::new(open_device(&port)?);
    info!("listening on {port}");

    while running.load(Ordering::SeqCst) && !engine.protocol_defined() {
        engine.run_setup_handshake()?;
    }

    while running.load(Ordering::SeqCst) {
        match engine.receive_batch()? {
            Received::Batch(batch) => println!("{batch}"),
            Received::Renegotiated(outcome) if !outcome.is_accepted() => {
                warn!("renegotiation failed, keeping previous configuration")
            }
            Received::Renegotiated(_) => {}
        }
    }

    Ok(())
}
