//! Shared plumbing for the `skirmish` and `simulate-vs` binaries.

pub mod console;
pub mod files;

use tracing::Level;

/// Diagnostics go to stderr so stdout stays clean for the journal and JSON.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
