#![forbid(unsafe_code)]

//! # Recoil CLI
//!
//! ## Usage
//!
//! ```bash
//! recoil simulate --tension 50 --friction 10      # CSV trajectory
//! recoil simulate -c spring.toml --format json    # settings file, JSON output
//! recoil convert --legacy-tension 40              # legacy -> physical
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use recoil_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    recoil_cli::run(&cli.command, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("RECOIL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
