//! Tracing setup for the two front ends.
//!
//! Headless mode logs to stderr so stdout stays a clean protocol stream.
//! The TUI owns the terminal, so it only logs when `COSMERE_LOG_FILE` names
//! a file to append to.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the TUI log file.
pub const LOG_FILE_VAR: &str = "COSMERE_LOG_FILE";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("cosmere=info,cosmere_core=info,warn"))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
pub fn init_tracing(headless: bool) -> Result<(), Box<dyn std::error::Error>> {
    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|e| e as Box<dyn std::error::Error>)?;
        return Ok(());
    }

    let Some(path) = std::env::var_os(LOG_FILE_VAR).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    Ok(())
}
