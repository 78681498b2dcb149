//! Unit tests for the logging helpers in the `sx1231-regcalc` crate.

use sx1231_regcalc::logging::{
    init_logger, log_export, log_group, log_import, log_info, log_partial_group,
};
use sx1231_regcalc::{import_dump, RadioConfig};

/// The helpers must not panic whether or not a logger is installed.
#[test]
fn test_logging() {
    log_group("Encoded", "bit_rate");
    log_partial_group("frequency_deviation");
    log_export(4, 60);
    log_import(3);
    log_info("This is an info message");
}

/// Only the first initialization installs a logger.
#[test]
fn test_init_logger() {
    let _ = init_logger();
    assert!(init_logger().is_err());
}

/// A partial group is logged and skipped, the rest of the dump still decodes.
#[test]
fn test_partial_group_logged_and_skipped() {
    let _ = init_logger();
    let config = import_dump("03 00\n12 05\n", &RadioConfig::default()).unwrap();
    assert_eq!(config.bit_rate, 4800);
    assert_eq!(config.pa_ramp, 5);
}
