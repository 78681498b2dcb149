//! # Radio Configuration Model
//!
//! `RadioConfig` is the typed, human-meaningful description of an SX1231 setup
//! that the register codec encodes and decodes. Physical quantities are kept in
//! their natural units (Hz, bps, dBm, mA); small register-sized codes (ramp
//! time, DIO mapping, thresholds) are kept as their raw field values.
//!
//! Fields that do not apply to the current mode (for example the AES key while
//! encryption is off, or the packet framing in continuous mode) are kept as
//! they are and simply not emitted. The `*_active` helpers below state those
//! applicability rules in one place.
//!
//! The default value matches the chip's power-on-reset register state, except
//! for the sync word value: the POR sync bytes are 0x00, which the chip does
//! not accept as sync word content, so the default uses 0x01 bytes.
//!
//! ## Snapshot Format
//!
//! Configurations (de)serialize with serde; missing fields take their defaults
//! and byte sequences are written as hex strings:
//! ```json
//! {
//!   "carrier_freq": 868000000,
//!   "bit_rate": 100000,
//!   "fdev": 50000,
//!   "sync_value": "2dd4",
//!   "sync_size": 2
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{RegCalcError, Result};
use crate::registers::{AES_KEY_LEN, DEFAULT_FXOSC_HZ};
use crate::util::hex::{decode_hex, encode_hex};
use crate::{derived, util};

/// Modulation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modulation {
    #[default]
    Fsk,
    Ook,
}

/// Data processing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    #[default]
    Packet,
    Continuous,
}

/// Transmitter output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaPin {
    /// RFIO pin, PA0
    #[default]
    Pa0,
    /// PA_BOOST pin, PA1 (plus PA2 above 13 dBm)
    Pa1,
}

/// LNA input impedance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LnaImpedance {
    #[default]
    #[serde(rename = "50")]
    Ohm50,
    #[serde(rename = "200")]
    Ohm200,
}

/// OOK demodulator threshold type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OokThresholdType {
    Fixed,
    #[default]
    Peak,
    Average,
}

impl OokThresholdType {
    pub fn code(self) -> u8 {
        match self {
            OokThresholdType::Fixed => 0,
            OokThresholdType::Peak => 1,
            OokThresholdType::Average => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(OokThresholdType::Fixed),
            1 => Some(OokThresholdType::Peak),
            2 => Some(OokThresholdType::Average),
            _ => None,
        }
    }
}

/// Condition for filling the FIFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FifoFillCondition {
    /// Fill when the sync address interrupt occurs
    #[default]
    SyncAddress,
    /// Fill as long as the condition is set
    Always,
}

/// Address based packet filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFiltering {
    #[default]
    None,
    Node,
    NodeOrBroadcast,
}

impl AddressFiltering {
    pub fn code(self) -> u8 {
        match self {
            AddressFiltering::None => 0,
            AddressFiltering::Node => 1,
            AddressFiltering::NodeOrBroadcast => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AddressFiltering::None),
            1 => Some(AddressFiltering::Node),
            2 => Some(AddressFiltering::NodeOrBroadcast),
            _ => None,
        }
    }

    /// Whether the address byte is part of the payload
    pub fn is_enabled(self) -> bool {
        self != AddressFiltering::None
    }
}

/// Packet length format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketFormat {
    #[default]
    Fixed,
    Variable,
    /// Fixed format with PayloadLength 0, no length limit
    Unlimited,
}

/// DC-free encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    None,
    Manchester,
    Whitening,
}

impl Encoding {
    pub fn code(self) -> u8 {
        match self {
            Encoding::None => 0,
            Encoding::Manchester => 1,
            Encoding::Whitening => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Encoding::None),
            1 => Some(Encoding::Manchester),
            2 => Some(Encoding::Whitening),
            _ => None,
        }
    }
}

/// Condition to start packet transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStartCondition {
    /// FifoLevel exceeds the FIFO threshold
    #[default]
    FifoLevel,
    /// At least one byte in the FIFO
    FifoNotEmpty,
}

/// Channel or AFC filter setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandwidth {
    /// RxBwMant as a number: 16, 20 or 24
    pub mantissa: u8,
    /// RxBwExp, 0-7
    pub exponent: u8,
    /// DC cancellation cut-off, 0-7
    pub dcc_freq: u8,
}

impl Bandwidth {
    pub const fn new(mantissa: u8, exponent: u8, dcc_freq: u8) -> Self {
        Self {
            mantissa,
            exponent,
            dcc_freq,
        }
    }
}

/// Automatic mode switching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoModes {
    /// EnterCondition, 0-7 (0 = none)
    pub enter_condition: u8,
    /// ExitCondition, 0-7 (0 = none)
    pub exit_condition: u8,
    /// IntermediateMode, 0-3
    pub intermediate_mode: u8,
}

/// 128-bit AES key, cleared from memory on drop
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey([u8; AES_KEY_LEN]);

impl AesKey {
    pub fn new(bytes: [u8; AES_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = decode_hex(text)
            .map_err(|e| RegCalcError::constraint("aes_key", e.to_string()))?;
        if bytes.len() != AES_KEY_LEN {
            let len = bytes.len();
            bytes.zeroize();
            return Err(RegCalcError::constraint(
                "aes_key",
                format!("key must be {AES_KEY_LEN} bytes, got {len}"),
            ));
        }
        let mut key = [0u8; AES_KEY_LEN];
        key.copy_from_slice(&bytes);
        bytes.zeroize();
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey(..)")
    }
}

impl Serialize for AesKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for AesKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut text = String::deserialize(deserializer)?;
        let key = AesKey::from_hex(&text).map_err(serde::de::Error::custom);
        text.zeroize();
        key
    }
}

/// Complete SX1231 configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Crystal oscillator frequency in Hz (defaults to 32 MHz)
    pub fxo: u32,

    /// Modulation scheme
    pub modulation: Modulation,
    /// Shaping: FSK 0 none, 1-3 Gaussian BT 1.0/0.5/0.3; OOK 0 none, 1-2 cutoff BR/2*BR
    pub modulation_shaping: u8,
    /// Bit rate in bps
    pub bit_rate: u32,
    /// Frequency deviation in Hz (FSK only)
    pub fdev: u32,
    /// Carrier frequency in Hz
    pub carrier_freq: u32,

    /// Transmitter pin
    pub pa_pin: PaPin,
    /// Output power in dBm
    pub pa_power: i8,
    /// PaRamp code, 0 (3.4 ms) to 15 (10 us)
    pub pa_ramp: u8,
    /// Over current protection
    pub ocp_on: bool,
    /// Over current trip level in mA, 45-120
    pub ocp_imax: u8,

    /// LnaGainSelect: 0 AGC, 1-6 fixed gain G1-G6
    pub lna_gain: u8,
    pub lna_zin: LnaImpedance,
    pub rx_bw: Bandwidth,
    pub afc_bw: Bandwidth,
    pub afc_auto_on: bool,
    pub afc_auto_clear_on: bool,
    /// Improved AFC for modulation index below 2
    pub afc_low_beta_on: bool,
    /// Low-beta AFC offset in Hz
    pub low_beta_afc_offset: i32,

    pub ook_thresh_type: OokThresholdType,
    pub ook_peak_thresh_step: u8,
    pub ook_peak_thresh_dec: u8,
    pub ook_average_thresh_filt: u8,
    pub ook_fixed_thresh: u8,
    pub ook_peak_thresh_floor: u8,

    pub data_mode: DataMode,
    /// Bit synchronizer, continuous mode only
    pub bit_sync_on: bool,

    /// Preamble length in bytes
    pub preamble_size: u16,
    pub sync_on: bool,
    /// Sync word length in bytes, 1-8
    pub sync_size: u8,
    /// Tolerated bit errors in the sync word, 0-7
    pub sync_tol: u8,
    #[serde(with = "util::hex::serde_bytes")]
    pub sync_value: Vec<u8>,
    pub fifo_fill_condition: FifoFillCondition,
    pub address_filtering: AddressFiltering,
    pub node_address: u8,
    pub broadcast_address: u8,
    pub packet_format: PacketFormat,
    pub encoding: Encoding,
    pub crc_on: bool,
    pub crc_auto_clear_off: bool,
    /// Message length in bytes, excluding length and address bytes
    pub payload_msg_len: u8,
    pub aes_on: bool,
    pub aes_key: AesKey,
    pub auto_rx_restart_on: bool,
    /// InterPacketRxDelay code, 2^code bit times; 12 and up means no delay
    pub inter_packet_rx_delay: u8,
    /// FIFO level interrupt threshold, 0-127
    pub fifo_threshold: u8,
    pub tx_start_condition: TxStartCondition,
    pub auto_modes_on: bool,
    pub auto_modes: AutoModes,

    /// DIO0-DIO5 mapping codes used in packet mode
    pub dio_packet: [u8; 6],
    /// DIO0-DIO5 mapping codes used in continuous mode
    pub dio_continuous: [u8; 6],
    /// ClkOut selector: 0-5 Fxosc/2^n, 6 RC oscillator, 7 off
    pub clk_out: u8,

    pub sensitivity_boost: bool,
    pub tcxo_input_on: bool,
    pub dagc_on: bool,
    /// RSSI interrupt threshold in dBm (0.5 dB steps)
    pub rssi_threshold: f64,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            fxo: DEFAULT_FXOSC_HZ,
            modulation: Modulation::Fsk,
            modulation_shaping: 0,
            bit_rate: 4800,
            fdev: 5005,
            carrier_freq: 915_000_000,
            pa_pin: PaPin::Pa0,
            pa_power: 13,
            pa_ramp: 9,
            ocp_on: true,
            ocp_imax: 95,
            lna_gain: 0,
            lna_zin: LnaImpedance::Ohm50,
            rx_bw: Bandwidth::new(16, 6, 4),
            afc_bw: Bandwidth::new(20, 2, 4),
            afc_auto_on: false,
            afc_auto_clear_on: false,
            afc_low_beta_on: false,
            low_beta_afc_offset: 0,
            ook_thresh_type: OokThresholdType::Peak,
            ook_peak_thresh_step: 0,
            ook_peak_thresh_dec: 0,
            ook_average_thresh_filt: 2,
            ook_fixed_thresh: 6,
            ook_peak_thresh_floor: 6,
            data_mode: DataMode::Packet,
            bit_sync_on: true,
            preamble_size: 3,
            sync_on: true,
            sync_size: 4,
            sync_tol: 0,
            sync_value: vec![0x01; 4],
            fifo_fill_condition: FifoFillCondition::SyncAddress,
            address_filtering: AddressFiltering::None,
            node_address: 0,
            broadcast_address: 0,
            packet_format: PacketFormat::Fixed,
            encoding: Encoding::None,
            crc_on: true,
            crc_auto_clear_off: false,
            payload_msg_len: 64,
            aes_on: false,
            aes_key: AesKey::default(),
            auto_rx_restart_on: true,
            inter_packet_rx_delay: 0,
            fifo_threshold: 15,
            tx_start_condition: TxStartCondition::FifoLevel,
            auto_modes_on: false,
            auto_modes: AutoModes::default(),
            dio_packet: [0; 6],
            dio_continuous: [0; 6],
            clk_out: 5,
            sensitivity_boost: false,
            tcxo_input_on: false,
            dagc_on: false,
            rssi_threshold: -127.5,
        }
    }
}

impl RadioConfig {
    /// Synthesizer frequency step in Hz for the configured crystal.
    pub fn fstep(&self) -> f64 {
        crate::convert::frequency_step(f64::from(self.fxo))
    }

    /// Modulation index, 2 * Fdev / BR.
    pub fn modulation_index(&self) -> f64 {
        derived::modulation_index(f64::from(self.fdev), f64::from(self.bit_rate))
    }

    /// Low-beta AFC only applies to FSK with a modulation index below 2.
    pub fn low_beta_afc_active(&self) -> bool {
        self.afc_low_beta_on
            && self.modulation == Modulation::Fsk
            && self.modulation_index() < 2.0
    }

    /// Unlimited length packets without sync word cannot carry an address byte.
    pub fn effective_address_filtering(&self) -> AddressFiltering {
        if self.packet_format == PacketFormat::Unlimited && !self.sync_on {
            AddressFiltering::None
        } else {
            self.address_filtering
        }
    }

    /// Unlimited length packets without sync word are sent unencoded.
    pub fn effective_encoding(&self) -> Encoding {
        if self.packet_format == PacketFormat::Unlimited && !self.sync_on {
            Encoding::None
        } else {
            self.encoding
        }
    }

    /// AES is unavailable for unlimited length packets.
    pub fn aes_active(&self) -> bool {
        self.aes_on && self.packet_format != PacketFormat::Unlimited
    }

    /// CrcAutoClearOff only means something while CRC checking is on.
    pub fn crc_auto_clear_off_active(&self) -> bool {
        self.crc_on && self.crc_auto_clear_off
    }

    /// DIO table for the data mode in effect.
    pub fn active_dio(&self) -> &[u8; 6] {
        match self.data_mode {
            DataMode::Packet => &self.dio_packet,
            DataMode::Continuous => &self.dio_continuous,
        }
    }

    pub(crate) fn active_dio_mut(&mut self) -> &mut [u8; 6] {
        match self.data_mode {
            DataMode::Packet => &mut self.dio_packet,
            DataMode::Continuous => &mut self.dio_continuous,
        }
    }

    /// Cross-field checks that the register fields alone cannot express.
    ///
    /// Runs before every encode. Width checks of individual fields are done by
    /// the register group codecs.
    pub fn validate(&self) -> Result<()> {
        if !derived::carrier_in_band(self.carrier_freq) {
            return Err(RegCalcError::constraint(
                "carrier_freq",
                format!(
                    "{} Hz is outside 290-340, 424-510 and 862-1020 MHz",
                    self.carrier_freq
                ),
            ));
        }
        if f64::from(self.carrier_freq) > derived::max_carrier_hz(f64::from(self.fxo)) {
            return Err(RegCalcError::constraint(
                "carrier_freq",
                format!("{} Hz is above the synthesizer range", self.carrier_freq),
            ));
        }

        let max_bit_rate = derived::max_bit_rate(self.modulation);
        if self.bit_rate > max_bit_rate {
            return Err(RegCalcError::constraint(
                "bit_rate",
                format!("{} bps exceeds {} bps", self.bit_rate, max_bit_rate),
            ));
        }

        if self.modulation == Modulation::Fsk {
            let beta = self.modulation_index();
            if !(0.5..=10.0).contains(&beta) {
                return Err(RegCalcError::constraint(
                    "fdev",
                    format!("modulation index {beta:.3} must be within 0.5..=10"),
                ));
            }
        }

        let (min_power, max_power) = derived::pa_power_range_dbm(self.pa_pin);
        if !(min_power..=max_power).contains(&self.pa_power) {
            return Err(RegCalcError::constraint(
                "pa_power",
                format!(
                    "{} dBm is outside {}..={} dBm for {:?}",
                    self.pa_power, min_power, max_power, self.pa_pin
                ),
            ));
        }

        for (field, bw) in [("rx_bw", self.rx_bw), ("afc_bw", self.afc_bw)] {
            if !derived::bandwidth_offered(self.modulation, bw.exponent) {
                return Err(RegCalcError::constraint(
                    field,
                    format!(
                        "exponent {} is not available for {:?}",
                        bw.exponent, self.modulation
                    ),
                ));
            }
        }

        if self.data_mode == DataMode::Packet && self.packet_format != PacketFormat::Unlimited {
            let limits = derived::payload_msg_len_limits(
                self.packet_format,
                self.aes_active(),
                self.effective_address_filtering().is_enabled(),
            );
            if !limits.contains(self.payload_msg_len) {
                return Err(RegCalcError::constraint(
                    "payload_msg_len",
                    format!(
                        "{} bytes is outside {}..={} bytes",
                        self.payload_msg_len, limits.min, limits.max
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RadioConfig::default();
        config.validate().unwrap();
        assert!((config.modulation_index() - 2.085).abs() < 0.01);
        assert!(!config.low_beta_afc_active());
    }

    #[test]
    fn test_applicability_rules() {
        let mut config = RadioConfig {
            packet_format: PacketFormat::Unlimited,
            sync_on: false,
            address_filtering: AddressFiltering::Node,
            encoding: Encoding::Whitening,
            aes_on: true,
            ..RadioConfig::default()
        };
        assert_eq!(config.effective_address_filtering(), AddressFiltering::None);
        assert_eq!(config.effective_encoding(), Encoding::None);
        assert!(!config.aes_active());

        config.sync_on = true;
        assert_eq!(config.effective_address_filtering(), AddressFiltering::Node);
        assert_eq!(config.effective_encoding(), Encoding::Whitening);

        config.crc_on = false;
        config.crc_auto_clear_off = true;
        assert!(!config.crc_auto_clear_off_active());
    }

    #[test]
    fn test_low_beta_requires_small_index() {
        let mut config = RadioConfig {
            afc_low_beta_on: true,
            bit_rate: 100_000,
            fdev: 50_000,
            ..RadioConfig::default()
        };
        assert!(config.low_beta_afc_active());
        config.fdev = 150_000;
        assert!(!config.low_beta_afc_active());
        config.fdev = 50_000;
        config.modulation = Modulation::Ook;
        assert!(!config.low_beta_afc_active());
    }

    #[test]
    fn test_validate_rejects() {
        let config = RadioConfig {
            carrier_freq: 600_000_000,
            ..RadioConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RegCalcError::ConstraintViolation { field: "carrier_freq", .. })
        ));

        let config = RadioConfig {
            pa_pin: PaPin::Pa0,
            pa_power: 17,
            ..RadioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RadioConfig {
            payload_msg_len: 0,
            ..RadioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RadioConfig {
            modulation: Modulation::Ook,
            bit_rate: 38_400,
            ..RadioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aes_key_hex() {
        let key = AesKey::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(key.as_bytes()[15], 0x0F);
        assert!(AesKey::from_hex("0001").is_err());
        assert_eq!(format!("{key:?}"), "AesKey(..)");
    }

    #[test]
    fn test_snapshot_defaults_fill_missing_fields() {
        let json = r#"{ "carrier_freq": 868000000, "sync_value": "2dd4", "sync_size": 2 }"#;
        let config: RadioConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.carrier_freq, 868_000_000);
        assert_eq!(config.sync_value, vec![0x2D, 0xD4]);
        assert_eq!(config.bit_rate, 4800);

        let text = serde_json::to_string(&config).unwrap();
        let back: RadioConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
