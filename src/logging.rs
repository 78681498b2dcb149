//! Logging setup and the log events of the register codec.

use log::{debug, info, log_enabled, warn, Level, SetLoggerError};

/// Initializes the logger with the `env_logger` crate.
///
/// Verbosity is taken from `RUST_LOG`. Fails if a logger is already installed.
pub fn init_logger() -> Result<(), SetLoggerError> {
    env_logger::try_init()
}

/// Logs a register group handled by the encoder or decoder.
pub fn log_group(direction: &str, group: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{direction} register group {group}");
    }
}

/// Logs a register group left out of an import because part of it is missing.
pub fn log_partial_group(group: &str) {
    warn!("Skipping register group {group}: not all of its registers are present");
}

/// Logs the size of an export diff.
pub fn log_export(written: usize, total: usize) {
    info!("Exported {written} of {total} registers that differ from POR");
}

/// Logs the number of registers taken from a dump.
pub fn log_import(registers: usize) {
    info!("Imported {registers} registers");
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
