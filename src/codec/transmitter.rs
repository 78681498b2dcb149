//! Transmitter registers: PA selection, ramp time and over current protection

use super::{always, field, CodecContext, RegisterGroup};
use crate::config::{PaPin, RadioConfig};
use crate::error::{RegCalcError, Result};
use crate::register_map::RegisterMap;
use crate::registers::*;

pub(super) const PA_LEVEL: RegisterGroup = RegisterGroup {
    name: "pa_level",
    addresses: &[REG_PALEVEL],
    applies: always,
    encode: encode_pa_level,
    decode: decode_pa_level,
};

pub(super) const PA_RAMP: RegisterGroup = RegisterGroup {
    name: "pa_ramp",
    addresses: &[REG_PARAMP],
    applies: always,
    encode: encode_pa_ramp,
    decode: decode_pa_ramp,
};

pub(super) const OCP: RegisterGroup = RegisterGroup {
    name: "ocp",
    addresses: &[REG_OCP],
    applies: always,
    encode: encode_ocp,
    decode: decode_ocp,
};

/// Over current trip levels the trimming field can express
const OCP_IMAX_RANGE_MA: std::ops::RangeInclusive<u8> = 45..=120;

fn encode_pa_level(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut flags = match config.pa_pin {
        PaPin::Pa0 => PaLevelFlags::PA0_ON,
        PaPin::Pa1 => PaLevelFlags::PA1_ON,
    };

    let mut power = i16::from(config.pa_power);
    if power > i16::from(RF_PALEVEL_BOOST_THRESHOLD_DBM) {
        power -= i16::from(RF_PALEVEL_BOOST_DB);
        flags |= PaLevelFlags::PA2_ON;
    }

    let level = power + i16::from(RF_PALEVEL_POWER_OFFSET);
    if !(0..=i16::from(RF_PALEVEL_OUTPUTPOWER_MASK)).contains(&level) {
        return Err(RegCalcError::constraint(
            "pa_power",
            format!("{} dBm cannot be programmed", config.pa_power),
        ));
    }

    regs.insert(REG_PALEVEL, flags.bits() | level as u8);
    Ok(())
}

fn decode_pa_level(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_PALEVEL) else {
        return Ok(false);
    };
    let flags = PaLevelFlags::from_bits_truncate(value);

    // PA0 alone, PA1 alone or PA1 boosted by PA2
    let boost = flags.contains(PaLevelFlags::PA2_ON);
    config.pa_pin = if flags == PaLevelFlags::PA0_ON {
        PaPin::Pa0
    } else if flags.contains(PaLevelFlags::PA1_ON) && !flags.contains(PaLevelFlags::PA0_ON) {
        PaPin::Pa1
    } else {
        return Err(RegCalcError::decode(REG_PALEVEL, "PaSelect", flags.bits()));
    };

    let mut power = (value & RF_PALEVEL_OUTPUTPOWER_MASK) as i8 - RF_PALEVEL_POWER_OFFSET;
    if boost {
        power += RF_PALEVEL_BOOST_DB;
    }
    config.pa_power = power;
    Ok(true)
}

fn encode_pa_ramp(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_PARAMP, field("pa_ramp", config.pa_ramp, RF_PARAMP_MASK)?);
    Ok(())
}

fn decode_pa_ramp(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_PARAMP) else {
        return Ok(false);
    };
    if value & !RF_PARAMP_MASK != 0 {
        return Err(RegCalcError::decode(REG_PARAMP, "PaRamp", value));
    }
    config.pa_ramp = value;
    Ok(true)
}

fn encode_ocp(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    if !config.ocp_on {
        regs.insert(REG_OCP, RF_OCP_OFF_DEFAULT);
        return Ok(());
    }

    if !OCP_IMAX_RANGE_MA.contains(&config.ocp_imax) {
        return Err(RegCalcError::constraint(
            "ocp_imax",
            format!("{} mA is outside 45..=120 mA", config.ocp_imax),
        ));
    }
    let trim = (f64::from(config.ocp_imax - RF_OCP_IMAX_BASE_MA) / f64::from(RF_OCP_IMAX_STEP_MA))
        .round() as u8;
    regs.insert(REG_OCP, RF_OCP_ON | (trim & RF_OCP_TRIM_MASK));
    Ok(())
}

fn decode_ocp(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_OCP) else {
        return Ok(false);
    };
    config.ocp_on = value & RF_OCP_ON != 0;
    // the trim field of a disabled OCP carries no setting
    if config.ocp_on {
        config.ocp_imax = RF_OCP_IMAX_BASE_MA + RF_OCP_IMAX_STEP_MA * (value & RF_OCP_TRIM_MASK);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_one(group: &RegisterGroup, config: &RadioConfig) -> Result<u8> {
        let mut regs = RegisterMap::new();
        (group.encode)(config, &CodecContext::for_config(config), &mut regs)?;
        Ok(regs.get(group.addresses[0]).unwrap())
    }

    fn decode_one(group: &RegisterGroup, value: u8) -> RadioConfig {
        let mut config = RadioConfig::default();
        let ctx = CodecContext::for_config(&config);
        let map: RegisterMap = [(group.addresses[0], value)].into_iter().collect();
        assert!((group.decode)(&map, &ctx, &mut config).unwrap());
        config
    }

    #[test]
    fn test_pa_boost_threshold() {
        let boosted = RadioConfig {
            pa_pin: PaPin::Pa1,
            pa_power: 17,
            ..RadioConfig::default()
        };
        assert_eq!(encode_one(&PA_LEVEL, &boosted).unwrap(), 0x7F);

        let plain = RadioConfig {
            pa_pin: PaPin::Pa1,
            pa_power: 13,
            ..RadioConfig::default()
        };
        let value = encode_one(&PA_LEVEL, &plain).unwrap();
        assert_eq!(value & 0x20, 0);
        assert_eq!(value, 0x40 | 31);

        let decoded = decode_one(&PA_LEVEL, 0x7F);
        assert_eq!((decoded.pa_pin, decoded.pa_power), (PaPin::Pa1, 17));
    }

    #[test]
    fn test_pa0_levels() {
        let config = RadioConfig {
            pa_power: -18,
            ..RadioConfig::default()
        };
        assert_eq!(encode_one(&PA_LEVEL, &config).unwrap(), 0x80);
        let decoded = decode_one(&PA_LEVEL, 0x9F);
        assert_eq!((decoded.pa_pin, decoded.pa_power), (PaPin::Pa0, 13));

        let config = RadioConfig {
            pa_power: -19,
            ..RadioConfig::default()
        };
        assert!(encode_one(&PA_LEVEL, &config).is_err());
    }

    #[test]
    fn test_ocp() {
        let config = RadioConfig::default();
        assert_eq!(encode_one(&OCP, &config).unwrap(), 0x1A);

        let off = RadioConfig {
            ocp_on: false,
            ocp_imax: 120,
            ..RadioConfig::default()
        };
        assert_eq!(encode_one(&OCP, &off).unwrap(), 0x0A);
        let decoded = decode_one(&OCP, 0x0A);
        assert!(!decoded.ocp_on);
        assert_eq!(decoded.ocp_imax, 95);

        assert_eq!(decode_one(&OCP, 0x1F).ocp_imax, 120);

        let too_high = RadioConfig {
            ocp_imax: 125,
            ..RadioConfig::default()
        };
        assert!(encode_one(&OCP, &too_high).is_err());
    }

    #[test]
    fn test_pa_ramp_width() {
        let config = RadioConfig {
            pa_ramp: 16,
            ..RadioConfig::default()
        };
        assert!(encode_one(&PA_RAMP, &config).is_err());
    }
}
