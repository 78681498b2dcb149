//! # Export Diff, Import and Register Comparison
//!
//! The export path reduces a full register map to the registers that have to
//! be written to a chip in a known baseline state, normally power-on reset.
//! The carrier frequency registers 0x07-0x09 are treated as one unit: the
//! chip only latches a new frequency when RegFrfLsb is written, so either all
//! three are written or none.
//!
//! The import path decodes a sparse dump on top of a prior configuration.
//!
//! `compare_registers` and `RegisterSession` produce the side-by-side view of
//! the current, previous and POR register values.

use serde::Serialize;

use crate::codec;
use crate::config::RadioConfig;
use crate::error::Result;
use crate::logging::{log_export, log_import};
use crate::register_map::{PorDefaults, RegisterMap};
use crate::registers::{REG_FRFLSB, REG_FRFMID, REG_FRFMSB};

/// Registers written together to change the carrier frequency
pub const FREQUENCY_GROUP: [u8; 3] = [REG_FRFMSB, REG_FRFMID, REG_FRFLSB];

/// Drop every register that already holds its baseline value.
///
/// The frequency group is only dropped when all three registers match the
/// baseline.
pub fn export_diff(current: &RegisterMap, baseline: &RegisterMap) -> RegisterMap {
    let frequency_unchanged = FREQUENCY_GROUP
        .iter()
        .all(|&addr| current.get(addr) == baseline.get(addr));

    current
        .iter()
        .filter(|&(addr, value)| {
            if FREQUENCY_GROUP.contains(&addr) {
                !frequency_unchanged
            } else {
                baseline.get(addr) != Some(value)
            }
        })
        .collect()
}

/// Encode a configuration and reduce it against the POR defaults.
pub fn export_config(config: &RadioConfig) -> Result<RegisterMap> {
    let full = codec::encode_config(config)?;
    let diff = export_diff(&full, &PorDefaults::map());
    log_export(diff.len(), full.len());
    Ok(diff)
}

/// Decode a sparse register map on top of `prior`.
///
/// Fails without touching anything if a present register holds an illegal
/// value.
pub fn import_registers(regs: &RegisterMap, prior: &RadioConfig) -> Result<RadioConfig> {
    let config = codec::decode_registers(regs, prior)?;
    log_import(regs.len());
    Ok(config)
}

/// Parse a register dump and decode it on top of `prior`.
pub fn import_dump(text: &str, prior: &RadioConfig) -> Result<RadioConfig> {
    let regs = RegisterMap::parse_dump(text)?;
    import_registers(&regs, prior)
}

/// One line of the register comparison view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterRow {
    pub address: u8,
    pub current: Option<u8>,
    pub previous: Option<u8>,
    pub por: Option<u8>,
    /// Current and previous value differ, including one of them being absent
    pub changed: bool,
}

/// Rows for every address known to the POR table or either map.
pub fn compare_registers(current: &RegisterMap, previous: &RegisterMap) -> Vec<RegisterRow> {
    (0..=u8::MAX)
        .filter_map(|address| {
            let por = PorDefaults::value(address);
            let cur = current.get(address);
            let prev = previous.get(address);
            if por.is_none() && cur.is_none() && prev.is_none() {
                return None;
            }
            Some(RegisterRow {
                address,
                current: cur,
                previous: prev,
                por,
                changed: cur != prev,
            })
        })
        .collect()
}

/// Keeps the last generated register map so the next one can be compared to it.
///
/// A new session starts from the POR register state.
#[derive(Debug, Clone)]
pub struct RegisterSession {
    previous: RegisterMap,
}

impl Default for RegisterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterSession {
    pub fn new() -> Self {
        Self {
            previous: PorDefaults::map(),
        }
    }

    /// Start from a known register state instead of POR.
    pub fn with_previous(previous: RegisterMap) -> Self {
        Self { previous }
    }

    pub fn previous(&self) -> &RegisterMap {
        &self.previous
    }

    /// Compare a register map to the previous one and make it the new baseline.
    pub fn compare(&mut self, current: RegisterMap) -> Vec<RegisterRow> {
        let rows = compare_registers(&current, &self.previous);
        self.previous = current;
        rows
    }

    /// Encode a configuration and compare the result to the previous map.
    ///
    /// The previous map is left alone when encoding fails.
    pub fn update(&mut self, config: &RadioConfig) -> Result<Vec<RegisterRow>> {
        let current = codec::encode_config(config)?;
        Ok(self.compare(current))
    }
}
