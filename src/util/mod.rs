//! # Utility Modules
//!
//! Small helpers shared across the crate.

pub mod hex;

pub use hex::{decode_hex, encode_hex, format_hex_compact, HexError};
