use anyhow::Result;

use berlin_foos_ranking::cli::Command;
use berlin_foos_ranking::{handle_ingest, handle_process, handle_serve, interpret};

fn main() {
    sensible_env_logger::init!();

    if let Err(e) = run(interpret()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(port),
        Command::Ingest { source } => handle_ingest(&source),
        Command::Process => handle_process(),
    }
}
