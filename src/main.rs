//! sumdir CLI: hash every file under DIR, print sorted digests, report duplicates.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use sumdir::engine::{Cli, handle_run};

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    match handle_run(&cli) {
        Ok(()) => {
            log::debug!("Total time: {:?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}
