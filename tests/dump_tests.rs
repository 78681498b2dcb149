//! Tests for the register dump text format and dump files.

use std::io::Write;

use sx1231_regcalc::{export_config, RadioConfig, RegCalcError, RegisterMap};
use tempfile::NamedTempFile;

/// Dumps are written in ascending address order with lowercase hex.
#[test]
fn test_dump_format() {
    let regs: RegisterMap = [(0x3E, 0xAB), (0x07, 0xD9), (0x08, 0x00)].into_iter().collect();
    assert_eq!(regs.to_dump(), "07 d9\n08 00\n3e ab\n");
    assert_eq!(regs.to_string(), regs.to_dump());
}

/// Mixed case, surrounding whitespace and blank lines are accepted.
#[test]
fn test_lenient_input() {
    let text = "\r\n  07 D9  \r\n\n08\t0\n\t\n";
    let regs = RegisterMap::parse_dump(text).unwrap();
    assert_eq!(regs.get(0x07), Some(0xD9));
    assert_eq!(regs.get(0x08), Some(0x00));
    assert_eq!(regs.len(), 2);
}

/// A later line for the same address wins.
#[test]
fn test_duplicate_address() {
    let regs = RegisterMap::parse_dump("38 10\n38 20\n").unwrap();
    assert_eq!(regs.get(0x38), Some(0x20));
}

/// Parse errors carry the 1-based line number.
#[test]
fn test_parse_error_lines() {
    let cases = [
        ("07 d9\n08\n", 2, "Syntax Error"),
        ("07 d9\n\n\n0x08 00\n", 4, "Syntax Error"),
        ("07 d9 # carrier\n", 1, "Syntax Error"),
        ("07 d9\n123 00\n", 2, "Address out of range"),
        ("07 100\n", 1, "Value out of range"),
    ];
    for (text, expected_line, expected_reason) in cases {
        match RegisterMap::parse_dump(text) {
            Err(RegCalcError::ParseError { line, reason }) => {
                assert_eq!(line, expected_line, "{text:?}");
                assert_eq!(reason, expected_reason, "{text:?}");
            }
            other => panic!("{text:?}: {other:?}"),
        }
    }
}

/// Dump files written by the crate read back to the same map.
#[test]
fn test_dump_file_round_trip() {
    let config = RadioConfig {
        carrier_freq: 868_000_000,
        ..RadioConfig::default()
    };
    let regs = export_config(&config).unwrap();

    let file = NamedTempFile::new().unwrap();
    regs.write_dump_file(file.path()).unwrap();
    let read_back = RegisterMap::read_dump_file(file.path()).unwrap();
    assert_eq!(read_back, regs);
}

/// Hand-written dump files are read with the same rules as text.
#[test]
fn test_read_hand_written_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "02 08").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "03 00").unwrap();
    writeln!(file, "04 zz").unwrap();
    file.flush().unwrap();

    let err = RegisterMap::read_dump_file(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "Line 4: Syntax Error");
}

/// A missing dump file is an I/O error.
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RegisterMap::read_dump_file(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, RegCalcError::Io(_)));
}
