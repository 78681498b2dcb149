//! # sx1231-regcalc - Register Calculator for the Semtech SX1231 Transceiver
//!
//! The sx1231-regcalc crate converts between a human-meaningful radio configuration and the
//! raw register map of the Semtech SX1231 sub-GHz transceiver (HopeRF RFM69 modules use the
//! same chip).
//!
//! ## Features
//!
//! - Encode a `RadioConfig` (modulation, bit rate, carrier, PA, receiver filters, packet
//!   framing, AES, DIO mapping) into exact register values
//! - Reduce a register map to the minimal write list against the power-on-reset state,
//!   keeping the carrier frequency registers together
//! - Decode an arbitrary partial register dump back into configuration fields
//! - Parse and write the `"<address> <value>"` register dump text format
//! - Compare consecutive register maps register by register
//! - Derived quantities such as the actual bit rate, filter bandwidth table and payload limits
//!
//! ## Usage
//!
//! ```rust
//! use sx1231_regcalc::{export_config, import_dump, RadioConfig};
//!
//! let config = RadioConfig {
//!     carrier_freq: 868_000_000,
//!     bit_rate: 100_000,
//!     fdev: 50_000,
//!     ..RadioConfig::default()
//! };
//! let writes = export_config(&config).unwrap();
//! print!("{}", writes.to_dump());
//!
//! let back = import_dump(&writes.to_dump(), &RadioConfig::default()).unwrap();
//! assert_eq!(back.carrier_freq, 868_000_000);
//! ```

pub mod codec;
pub mod config;
pub mod convert;
pub mod derived;
pub mod diff;
pub mod error;
pub mod logging;
pub mod register_map;
pub mod registers;
pub mod util;

pub use crate::error::{RegCalcError, Result};
pub use crate::logging::{init_logger, log_info};

// Configuration model
pub use config::{
    AddressFiltering, AesKey, AutoModes, Bandwidth, DataMode, Encoding, FifoFillCondition,
    LnaImpedance, Modulation, OokThresholdType, PaPin, PacketFormat, RadioConfig,
    TxStartCondition,
};

// Register maps and codec
pub use codec::{decode_registers, encode_config, CodecContext, RegisterGroup, REGISTER_GROUPS};
pub use register_map::{PorDefaults, RegisterMap};

// Export, import and comparison
pub use diff::{
    compare_registers, export_config, export_diff, import_dump, import_registers, RegisterRow,
    RegisterSession,
};
