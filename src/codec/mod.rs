//! # Register Group Codecs
//!
//! The SX1231 register file is handled as a static table of register groups.
//! Each group names the addresses it owns, the configurations it applies to,
//! and a pair of functions translating between `RadioConfig` fields and raw
//! register bytes.
//!
//! ## Encoding
//!
//! `encode_config` validates the configuration and runs the encoder of every
//! group whose applicability predicate holds. The result holds every register
//! the active configuration defines.
//!
//! ## Decoding
//!
//! `decode_registers` starts from a prior configuration and runs every group
//! decoder in table order. A decoder only touches the configuration when all
//! registers it needs are present, so absent fields keep their prior value.
//! Groups that depend on other groups come later in the table: RegDataModul is
//! decoded before the DIO mapping, RegSyncConfig before the sync word bytes and
//! RegPacketConfig1 before RegPayloadLength.


use crate::config::{DataMode, Modulation, RadioConfig};
use crate::error::{RegCalcError, Result};
use crate::logging::{log_group, log_partial_group};
use crate::register_map::RegisterMap;

mod dio;
mod modem;
mod packet;
mod receiver;
mod test_regs;
mod transmitter;

/// Values derived from the configuration that several groups need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecContext {
    /// Crystal frequency in Hz
    pub fxo: f64,
    /// Synthesizer frequency step in Hz
    pub fstep: f64,
}

impl CodecContext {
    pub fn for_config(config: &RadioConfig) -> Self {
        Self {
            fxo: f64::from(config.fxo),
            fstep: config.fstep(),
        }
    }
}

pub(crate) type EncodeFn = fn(&RadioConfig, &CodecContext, &mut RegisterMap) -> Result<()>;

/// Returns `Ok(false)` when registers the group needs are missing.
pub(crate) type DecodeFn = fn(&RegisterMap, &CodecContext, &mut RadioConfig) -> Result<bool>;

/// One entry of the register group table
pub struct RegisterGroup {
    pub name: &'static str,
    /// Every address the group may write
    pub addresses: &'static [u8],
    /// Whether the group is emitted for a configuration
    pub applies: fn(&RadioConfig) -> bool,
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
}

impl std::fmt::Debug for RegisterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterGroup")
            .field("name", &self.name)
            .field("addresses", &self.addresses)
            .finish()
    }
}

/// All register groups in decode order.
pub const REGISTER_GROUPS: &[RegisterGroup] = &[
    modem::DATA_MODULATION,
    modem::BIT_RATE,
    modem::FREQUENCY_DEVIATION,
    modem::CARRIER_FREQUENCY,
    modem::AFC_CONTROL,
    transmitter::PA_LEVEL,
    transmitter::PA_RAMP,
    transmitter::OCP,
    receiver::LNA,
    receiver::RX_BANDWIDTH,
    receiver::AFC_BANDWIDTH,
    receiver::OOK_PEAK,
    receiver::OOK_AVERAGE,
    receiver::OOK_FIXED,
    receiver::AFC_FEI,
    dio::DIO_MAPPING_1,
    dio::DIO_MAPPING_2,
    receiver::RSSI_THRESHOLD,
    packet::PREAMBLE,
    packet::SYNC_CONFIG,
    packet::SYNC_VALUE,
    packet::PACKET_CONFIG_1,
    packet::PAYLOAD_LENGTH,
    packet::NODE_ADDRESS,
    packet::BROADCAST_ADDRESS,
    packet::AUTO_MODES,
    packet::FIFO_THRESHOLD,
    packet::PACKET_CONFIG_2,
    packet::AES_KEY,
    test_regs::TEST_LNA,
    test_regs::TEST_TCXO,
    test_regs::TEST_DAGC,
    test_regs::TEST_AFC,
];

/// Look up a register group by name.
pub fn register_group(name: &str) -> Option<&'static RegisterGroup> {
    REGISTER_GROUPS.iter().find(|group| group.name == name)
}

/// Encode a configuration into its complete register map.
pub fn encode_config(config: &RadioConfig) -> Result<RegisterMap> {
    config.validate()?;

    let ctx = CodecContext::for_config(config);
    let mut regs = RegisterMap::new();
    for group in REGISTER_GROUPS {
        if !(group.applies)(config) {
            continue;
        }
        (group.encode)(config, &ctx, &mut regs)?;
        log_group("Encoded", group.name);
    }
    Ok(regs)
}

/// Decode a sparse register map on top of a prior configuration.
///
/// Groups with none of their registers present are left alone. Groups with
/// only part of their registers present are skipped with a warning.
pub fn decode_registers(regs: &RegisterMap, prior: &RadioConfig) -> Result<RadioConfig> {
    let mut config = prior.clone();
    let ctx = CodecContext::for_config(prior);

    for group in REGISTER_GROUPS {
        if (group.decode)(regs, &ctx, &mut config)? {
            log_group("Decoded", group.name);
        } else if group.addresses.iter().any(|&addr| regs.contains(addr)) {
            log_partial_group(group.name);
        }
    }
    Ok(config)
}

pub(crate) fn always(_: &RadioConfig) -> bool {
    true
}

pub(crate) fn fsk_only(config: &RadioConfig) -> bool {
    config.modulation == Modulation::Fsk
}

pub(crate) fn ook_only(config: &RadioConfig) -> bool {
    config.modulation == Modulation::Ook
}

pub(crate) fn packet_mode(config: &RadioConfig) -> bool {
    config.data_mode == DataMode::Packet
}

/// Check that a value fits a register field of `max` or less.
pub(crate) fn field(name: &'static str, value: u8, max: u8) -> Result<u8> {
    if value > max {
        return Err(RegCalcError::constraint(
            name,
            format!("{value} does not fit the register field (max {max})"),
        ));
    }
    Ok(value)
}

/// Converter errors in the encode path are reported against the field.
pub(crate) fn as_constraint(name: &'static str, err: RegCalcError) -> RegCalcError {
    match err {
        RegCalcError::InvalidParameter { reason, .. } => RegCalcError::constraint(name, reason),
        other => other,
    }
}
