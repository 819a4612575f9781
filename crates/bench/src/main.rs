pub mod config;
pub mod driver;
pub mod error;
pub mod report;
#[cfg(test)]
mod testing;

use std::io::{self, Write};
use std::process;

use cache_conflict_core::DefaultCounter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    info!(mode = ?config.mode, "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = driver::run(&config, DefaultCounter::default(), &mut out) {
        fail(&e);
    }
}

/// Logs a fatal error, repeats it on stderr whatever the log filter, and exits 1.
fn fail(e: &error::Error) -> ! {
    error!("{}", e);
    let _ = write_fatal(e, &mut io::stderr());
    process::exit(1);
}

fn write_fatal<W: Write>(e: &error::Error, out: &mut W) -> io::Result<()> {
    writeln!(out, "error: {}", e)
}

/// Diagnostics go to stderr so stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
