//! # Register Calculator Error Handling
//!
//! This module defines the RegCalcError enum, which represents the different error
//! types that can occur while converting between radio settings and SX1231 registers.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegCalcError>;

/// Represents the different error types that can occur in the register calculator.
#[derive(Debug, Error)]
pub enum RegCalcError {
    /// A quantity converter received a value outside its mathematical domain.
    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// A chip-level rule between configuration fields is broken.
    #[error("Constraint violation on {field}: {reason}")]
    ConstraintViolation { field: &'static str, reason: String },

    /// Malformed register dump text.
    #[error("Line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// A register holds a bit pattern with no legal meaning.
    #[error("[0x{register:02x}.{field}] Invalid value 0x{value:02x}")]
    DecodeError {
        register: u8,
        field: &'static str,
        value: u8,
    },

    /// File access from the command line front end.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration snapshot (de)serialization.
    #[error("Configuration format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegCalcError {
    pub(crate) fn invalid_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        RegCalcError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn constraint(field: &'static str, reason: impl Into<String>) -> Self {
        RegCalcError::ConstraintViolation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(register: u8, field: &'static str, value: u8) -> Self {
        RegCalcError::DecodeError {
            register,
            field,
            value,
        }
    }
}
