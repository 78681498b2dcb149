//! # Derived Quantities
//!
//! Helper calculations around the register codec: values a front end shows
//! next to the settings (actual bit rate, bandwidth choices, CLKOUT frequency,
//! inter-packet delay) and the limits used by `RadioConfig::validate`.

use serde::Serialize;

use crate::config::{Modulation, PacketFormat, PaPin};
use crate::convert::{self, BW_EXPONENT_MAX, FRF_MAX};
use crate::error::Result;
use crate::registers::{AES_KEY_LEN, RF_PALEVEL_BOOST_DB, RF_PALEVEL_BOOST_THRESHOLD_DBM};

/// Frequency bands supported by the synthesizer, in Hz
pub const CARRIER_BANDS_HZ: [(u32, u32); 3] = [
    (290_000_000, 340_000_000),
    (424_000_000, 510_000_000),
    (862_000_000, 1_020_000_000),
];

/// Upper end of the highest band
pub const CARRIER_MAX_HZ: f64 = 1_020_000_000.0;

/// Maximum bit rate in FSK mode
pub const FSK_MAX_BIT_RATE: u32 = 300_000;

/// Maximum bit rate in OOK mode
pub const OOK_MAX_BIT_RATE: u32 = 32_768;

/// Frequency of the internal RC oscillator selectable on CLKOUT
pub const RC_OSC_HZ: f64 = 62_500.0;

/// InterPacketRxDelay codes from this value up disable the delay
pub const INTER_PACKET_RX_DELAY_NONE: u8 = 12;

/// Smallest RxBwExp offered in OOK mode
pub const OOK_MIN_BW_EXPONENT: u8 = 1;

/// Bit rate the chip really runs at for a wanted bit rate.
pub fn actual_bit_rate(fxo_hz: f64, wanted_bit_rate: f64) -> Result<f64> {
    let divisor = convert::bit_rate_reg_value(fxo_hz, wanted_bit_rate)?;
    convert::bit_rate_hz(fxo_hz, divisor)
}

/// Modulation index beta = 2 * Fdev / BR.
pub fn modulation_index(fdev_hz: f64, bit_rate: f64) -> f64 {
    2.0 * fdev_hz / bit_rate
}

/// Output power range for a PA pin, in dBm.
pub fn pa_power_range_dbm(pin: PaPin) -> (i8, i8) {
    match pin {
        PaPin::Pa0 => (-18, RF_PALEVEL_BOOST_THRESHOLD_DBM),
        PaPin::Pa1 => (-18, RF_PALEVEL_BOOST_THRESHOLD_DBM + RF_PALEVEL_BOOST_DB),
    }
}

/// Highest carrier frequency reachable with a crystal.
pub fn max_carrier_hz(fxo_hz: f64) -> f64 {
    (convert::frequency_step(fxo_hz) * f64::from(FRF_MAX)).min(CARRIER_MAX_HZ)
}

/// Whether a carrier frequency lies in one of the supported bands.
pub fn carrier_in_band(freq_hz: u32) -> bool {
    CARRIER_BANDS_HZ
        .iter()
        .any(|&(low, high)| (low..=high).contains(&freq_hz))
}

/// Maximum bit rate for a modulation scheme.
pub fn max_bit_rate(modulation: Modulation) -> u32 {
    match modulation {
        Modulation::Fsk => FSK_MAX_BIT_RATE,
        Modulation::Ook => OOK_MAX_BIT_RATE,
    }
}

/// One selectable receiver filter setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandwidthOption {
    pub mantissa: u8,
    pub exponent: u8,
    /// Single side band bandwidth in FSK mode
    pub fsk_hz: f64,
    /// Single side band bandwidth in OOK mode (one octave lower)
    pub ook_hz: f64,
}

/// Every mantissa/exponent combination, narrowest first.
pub fn bandwidth_options(fxo_hz: f64) -> Result<Vec<BandwidthOption>> {
    let mut options = Vec::with_capacity(24);
    for exponent in (0..=BW_EXPONENT_MAX).rev() {
        for mantissa in [24, 20, 16] {
            let fsk_hz = convert::rx_bandwidth_hz(fxo_hz, mantissa, exponent)?;
            options.push(BandwidthOption {
                mantissa,
                exponent,
                fsk_hz,
                ook_hz: fsk_hz / 2.0,
            });
        }
    }
    Ok(options)
}

/// Whether a filter exponent is offered for a modulation.
///
/// The OOK table sits one octave below the FSK one, so its widest row
/// (exponent 0) is not available.
pub fn bandwidth_offered(modulation: Modulation, exponent: u8) -> bool {
    let min = match modulation {
        Modulation::Fsk => 0,
        Modulation::Ook => OOK_MIN_BW_EXPONENT,
    };
    (min..=BW_EXPONENT_MAX).contains(&exponent)
}

/// Receiver filter bandwidth for the modulation in use.
pub fn rx_bandwidth_for(
    modulation: Modulation,
    fxo_hz: f64,
    mantissa: u8,
    exponent: u8,
) -> Result<f64> {
    let fsk_hz = convert::rx_bandwidth_hz(fxo_hz, mantissa, exponent)?;
    Ok(match modulation {
        Modulation::Fsk => fsk_hz,
        Modulation::Ook => fsk_hz / 2.0,
    })
}

/// CLKOUT frequency for a ClkOut selector; `None` when the output is off.
pub fn clk_out_hz(fxo_hz: f64, selector: u8) -> Option<f64> {
    match selector {
        0..=5 => Some(fxo_hz / f64::from(1u32 << selector)),
        6 => Some(RC_OSC_HZ),
        _ => None,
    }
}

/// Delay between FIFO empty and the next RSSI phase, in ms.
///
/// Returns `None` when the code disables the delay.
pub fn inter_packet_rx_delay_ms(code: u8, bit_rate: f64) -> Option<f64> {
    if code >= INTER_PACKET_RX_DELAY_NONE {
        return None;
    }
    Some(f64::from(1u32 << code) * 1000.0 / bit_rate)
}

/// Allowed payload message length range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayloadLimits {
    pub min: u8,
    pub max: u8,
}

impl PayloadLimits {
    pub fn contains(&self, len: u8) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// Message length limits for a packet layout.
///
/// With AES the FIFO bounds the message to 64 bytes (48 with a length and an
/// address byte). Without AES the 8-bit PayloadLength field has to hold the
/// message plus the optional length and address bytes.
pub fn payload_msg_len_limits(
    format: PacketFormat,
    aes_on: bool,
    address_filtering: bool,
) -> PayloadLimits {
    let variable = format == PacketFormat::Variable;
    let max = if aes_on {
        if variable && address_filtering {
            48
        } else {
            64
        }
    } else {
        255 - u8::from(variable) - u8::from(address_filtering)
    };
    let min = if address_filtering { 0 } else { 1 };
    PayloadLimits { min, max }
}

/// Padding bytes added to fill the last AES block.
pub fn aes_padding_len(msg_len: usize) -> usize {
    let padded = msg_len.div_ceil(AES_KEY_LEN) * AES_KEY_LEN;
    padded - msg_len
}
