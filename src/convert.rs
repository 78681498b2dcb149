//! # Quantity Converters
//!
//! Pure functions mapping physical quantities (Hz, dBm) to the register-scale
//! integers the SX1231 works with, and back. Every converter checks its input
//! domain and reports `InvalidParameter` instead of producing a value that
//! would not fit the target register field.
//!
//! | Quantity            | Register value                  | Width  |
//! |---------------------|---------------------------------|--------|
//! | Carrier frequency   | `round(f / Fstep)`              | 24 bit |
//! | Bit rate            | `round(Fxosc / BR)`             | 16 bit |
//! | Frequency deviation | `round(Fdev / Fstep)`           | 14 bit |
//! | RSSI threshold      | `-2 * dBm`                      | 8 bit  |
//! | Low-beta AFC offset | `round(offset / 488 Hz)`        | 8 bit  |
//!
//! with `Fstep = Fxosc / 2^19`.

use crate::error::{RegCalcError, Result};
use crate::registers::AFC_OFFSET_STEP_HZ;

/// Largest value of the 24-bit RegFrf field
pub const FRF_MAX: u32 = 0x00FF_FFFF;

/// Largest value of the 14-bit RegFdev field
pub const FDEV_MAX: u16 = 0x3FFF;

/// Receiver bandwidth mantissas and their RxBwMant codes
pub const BW_MANTISSAS: [(u8, u8); 3] = [(16, 0), (20, 1), (24, 2)];

/// Largest RxBwExp value
pub const BW_EXPONENT_MAX: u8 = 7;

/// Synthesizer frequency step for a crystal frequency.
pub fn frequency_step(fxo_hz: f64) -> f64 {
    fxo_hz / f64::from(1u32 << 19)
}

fn check_step(fstep: f64) -> Result<()> {
    if fstep.is_finite() && fstep > 0.0 {
        Ok(())
    } else {
        Err(RegCalcError::invalid_parameter(
            "fstep",
            format!("frequency step must be positive, got {fstep}"),
        ))
    }
}

fn check_non_negative(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RegCalcError::invalid_parameter(
            parameter,
            format!("must be a non-negative number, got {value}"),
        ))
    }
}

/// RegFrf value for a carrier frequency.
pub fn carrier_reg_value(freq_hz: f64, fstep: f64) -> Result<u32> {
    check_step(fstep)?;
    check_non_negative("carrier_frequency", freq_hz)?;

    let value = (freq_hz / fstep).round();
    if value > f64::from(FRF_MAX) {
        return Err(RegCalcError::invalid_parameter(
            "carrier_frequency",
            format!("{freq_hz} Hz exceeds the 24-bit synthesizer range"),
        ));
    }
    Ok(value as u32)
}

/// Split a 24-bit RegFrf value MSB first.
pub fn carrier_bytes(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Carrier frequency in Hz for a RegFrf value.
pub fn carrier_hz(value: u32, fstep: f64) -> f64 {
    f64::from(value) * fstep
}

/// RegBitrate divisor for a bit rate.
pub fn bit_rate_reg_value(fxo_hz: f64, bit_rate: f64) -> Result<u16> {
    if !(bit_rate.is_finite() && bit_rate > 0.0) {
        return Err(RegCalcError::invalid_parameter(
            "bit_rate",
            format!("bit rate must be positive, got {bit_rate}"),
        ));
    }
    check_non_negative("fxo", fxo_hz)?;

    let divisor = (fxo_hz / bit_rate).round();
    if divisor < 1.0 {
        return Err(RegCalcError::invalid_parameter(
            "bit_rate",
            format!("{bit_rate} bps gives a zero bit rate divisor"),
        ));
    }
    if divisor > f64::from(u16::MAX) {
        return Err(RegCalcError::invalid_parameter(
            "bit_rate",
            format!("{bit_rate} bps needs a divisor above 0xffff"),
        ));
    }
    Ok(divisor as u16)
}

/// Bit rate in bps for a RegBitrate divisor.
pub fn bit_rate_hz(fxo_hz: f64, divisor: u16) -> Result<f64> {
    if divisor == 0 {
        return Err(RegCalcError::invalid_parameter(
            "bit_rate",
            "bit rate divisor is zero",
        ));
    }
    Ok(fxo_hz / f64::from(divisor))
}

/// RegFdev value for a frequency deviation.
pub fn freq_dev_reg_value(fdev_hz: f64, fstep: f64) -> Result<u16> {
    check_step(fstep)?;
    check_non_negative("frequency_deviation", fdev_hz)?;

    let value = (fdev_hz / fstep).round();
    if value > f64::from(FDEV_MAX) {
        return Err(RegCalcError::invalid_parameter(
            "frequency_deviation",
            format!("{fdev_hz} Hz exceeds the 14-bit deviation field"),
        ));
    }
    Ok(value as u16)
}

/// Frequency deviation in Hz for a RegFdev value.
pub fn freq_dev_hz(value: u16, fstep: f64) -> f64 {
    f64::from(value) * fstep
}

/// RxBwMant code for a bandwidth mantissa.
pub fn bw_mantissa_code(mantissa: u8) -> Result<u8> {
    BW_MANTISSAS
        .iter()
        .find(|(m, _)| *m == mantissa)
        .map(|(_, code)| *code)
        .ok_or_else(|| {
            RegCalcError::invalid_parameter(
                "bandwidth_mantissa",
                format!("mantissa must be 16, 20 or 24, got {mantissa}"),
            )
        })
}

/// Bandwidth mantissa for a RxBwMant code; code 3 is reserved.
pub fn bw_mantissa_from_code(code: u8) -> Option<u8> {
    BW_MANTISSAS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(m, _)| *m)
}

/// Single side band channel filter bandwidth in FSK mode.
pub fn rx_bandwidth_hz(fxo_hz: f64, mantissa: u8, exponent: u8) -> Result<f64> {
    bw_mantissa_code(mantissa)?;
    if exponent > BW_EXPONENT_MAX {
        return Err(RegCalcError::invalid_parameter(
            "bandwidth_exponent",
            format!("exponent must be 0..=7, got {exponent}"),
        ));
    }
    Ok(fxo_hz / (f64::from(mantissa) * f64::from(1u32 << (exponent + 2))))
}

/// RegRssiThresh value for a threshold in dBm.
pub fn rssi_reg_value(dbm: f64) -> Result<u8> {
    let value = (dbm * -2.0).round();
    if !(0.0..=255.0).contains(&value) {
        return Err(RegCalcError::invalid_parameter(
            "rssi_threshold",
            format!("{dbm} dBm is outside -127.5..=0 dBm"),
        ));
    }
    Ok(value as u8)
}

/// RSSI threshold in dBm for a RegRssiThresh value.
pub fn rssi_dbm(value: u8) -> f64 {
    f64::from(value) / -2.0
}

/// RegTestAfc value (two's complement, 488 Hz steps) for an offset in Hz.
pub fn afc_offset_reg_value(hz: f64) -> Result<u8> {
    if !hz.is_finite() {
        return Err(RegCalcError::invalid_parameter(
            "low_beta_afc_offset",
            format!("offset must be finite, got {hz}"),
        ));
    }
    let steps = (hz / AFC_OFFSET_STEP_HZ).round();
    if !(f64::from(i8::MIN)..=f64::from(i8::MAX)).contains(&steps) {
        return Err(RegCalcError::invalid_parameter(
            "low_beta_afc_offset",
            format!("{hz} Hz is outside the signed 8-bit step range"),
        ));
    }
    Ok(steps as i8 as u8)
}

/// Low-beta AFC offset in Hz for a RegTestAfc value.
pub fn afc_offset_hz(value: u8) -> f64 {
    f64::from(value as i8) * AFC_OFFSET_STEP_HZ
}
