//! Receiver registers: LNA, channel and AFC filters, OOK demodulator, AFC/FEI and RSSI

use super::{always, as_constraint, field, ook_only, CodecContext, RegisterGroup};
use crate::config::{Bandwidth, LnaImpedance, Modulation, OokThresholdType, RadioConfig};
use crate::convert;
use crate::error::{RegCalcError, Result};
use crate::register_map::RegisterMap;
use crate::registers::*;

pub(super) const LNA: RegisterGroup = RegisterGroup {
    name: "lna",
    addresses: &[REG_LNA],
    applies: always,
    encode: encode_lna,
    decode: decode_lna,
};

pub(super) const RX_BANDWIDTH: RegisterGroup = RegisterGroup {
    name: "rx_bandwidth",
    addresses: &[REG_RXBW],
    applies: always,
    encode: encode_rx_bandwidth,
    decode: decode_rx_bandwidth,
};

pub(super) const AFC_BANDWIDTH: RegisterGroup = RegisterGroup {
    name: "afc_bandwidth",
    addresses: &[REG_AFCBW],
    applies: always,
    encode: encode_afc_bandwidth,
    decode: decode_afc_bandwidth,
};

pub(super) const OOK_PEAK: RegisterGroup = RegisterGroup {
    name: "ook_peak",
    addresses: &[REG_OOKPEAK],
    applies: ook_only,
    encode: encode_ook_peak,
    decode: decode_ook_peak,
};

pub(super) const OOK_AVERAGE: RegisterGroup = RegisterGroup {
    name: "ook_average",
    addresses: &[REG_OOKAVG],
    applies: ook_average_threshold,
    encode: encode_ook_average,
    decode: decode_ook_average,
};

pub(super) const OOK_FIXED: RegisterGroup = RegisterGroup {
    name: "ook_fixed",
    addresses: &[REG_OOKFIX],
    applies: ook_fixed_or_peak_threshold,
    encode: encode_ook_fixed,
    decode: decode_ook_fixed,
};

pub(super) const AFC_FEI: RegisterGroup = RegisterGroup {
    name: "afc_fei",
    addresses: &[REG_AFCFEI],
    applies: always,
    encode: encode_afc_fei,
    decode: decode_afc_fei,
};

pub(super) const RSSI_THRESHOLD: RegisterGroup = RegisterGroup {
    name: "rssi_threshold",
    addresses: &[REG_RSSITHRESH],
    applies: always,
    encode: encode_rssi_threshold,
    decode: decode_rssi_threshold,
};

/// LnaGainSelect codes 0 (AGC) to 6 (G6), 7 is reserved
const LNA_GAIN_MAX: u8 = 6;

fn ook_average_threshold(config: &RadioConfig) -> bool {
    config.modulation == Modulation::Ook && config.ook_thresh_type == OokThresholdType::Average
}

fn ook_fixed_or_peak_threshold(config: &RadioConfig) -> bool {
    config.modulation == Modulation::Ook && config.ook_thresh_type != OokThresholdType::Average
}

fn encode_lna(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut value = field("lna_gain", config.lna_gain, LNA_GAIN_MAX)? | RF_LNA_RESERVED;
    if config.lna_zin == LnaImpedance::Ohm200 {
        value |= RF_LNA_ZIN_200;
    }
    regs.insert(REG_LNA, value);
    Ok(())
}

fn decode_lna(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_LNA) else {
        return Ok(false);
    };
    let gain = value & RF_LNA_GAINSELECT_MASK;
    if gain > LNA_GAIN_MAX {
        return Err(RegCalcError::decode(REG_LNA, "LnaGainSelect", gain));
    }
    config.lna_gain = gain;
    config.lna_zin = if value & RF_LNA_ZIN_200 != 0 {
        LnaImpedance::Ohm200
    } else {
        LnaImpedance::Ohm50
    };
    Ok(true)
}

fn bandwidth_value(name: &'static str, bw: &Bandwidth) -> Result<u8> {
    let mantissa = convert::bw_mantissa_code(bw.mantissa).map_err(|e| as_constraint(name, e))?;
    let exponent = field(name, bw.exponent, RF_RXBW_EXP_MASK)?;
    let dcc = field(name, bw.dcc_freq, 0x07)?;
    Ok((dcc << RF_RXBW_DCCFREQ_SHIFT) | (mantissa << RF_RXBW_MANT_SHIFT) | exponent)
}

fn bandwidth_from_value(register: u8, value: u8) -> Result<Bandwidth> {
    let code = (value >> RF_RXBW_MANT_SHIFT) & RF_RXBW_MANT_MASK;
    let mantissa = convert::bw_mantissa_from_code(code)
        .ok_or_else(|| RegCalcError::decode(register, "RxBwMant", code))?;
    Ok(Bandwidth::new(
        mantissa,
        value & RF_RXBW_EXP_MASK,
        value >> RF_RXBW_DCCFREQ_SHIFT,
    ))
}

fn encode_rx_bandwidth(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_RXBW, bandwidth_value("rx_bw", &config.rx_bw)?);
    Ok(())
}

fn decode_rx_bandwidth(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_RXBW) else {
        return Ok(false);
    };
    config.rx_bw = bandwidth_from_value(REG_RXBW, value)?;
    Ok(true)
}

fn encode_afc_bandwidth(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_AFCBW, bandwidth_value("afc_bw", &config.afc_bw)?);
    Ok(())
}

fn decode_afc_bandwidth(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_AFCBW) else {
        return Ok(false);
    };
    config.afc_bw = bandwidth_from_value(REG_AFCBW, value)?;
    Ok(true)
}

fn encode_ook_peak(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut value = config.ook_thresh_type.code() << RF_OOKPEAK_THRESHTYPE_SHIFT;
    if config.ook_thresh_type == OokThresholdType::Peak {
        let step = field(
            "ook_peak_thresh_step",
            config.ook_peak_thresh_step,
            RF_OOKPEAK_FIELD_MASK,
        )?;
        let dec = field(
            "ook_peak_thresh_dec",
            config.ook_peak_thresh_dec,
            RF_OOKPEAK_FIELD_MASK,
        )?;
        value |= (step << RF_OOKPEAK_PEAKTHRESHSTEP_SHIFT) | dec;
    }
    regs.insert(REG_OOKPEAK, value);
    Ok(())
}

fn decode_ook_peak(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_OOKPEAK) else {
        return Ok(false);
    };
    let code = value >> RF_OOKPEAK_THRESHTYPE_SHIFT;
    config.ook_thresh_type = OokThresholdType::from_code(code)
        .ok_or_else(|| RegCalcError::decode(REG_OOKPEAK, "OokThreshType", code))?;
    if config.ook_thresh_type == OokThresholdType::Peak {
        config.ook_peak_thresh_step = (value >> RF_OOKPEAK_PEAKTHRESHSTEP_SHIFT) & RF_OOKPEAK_FIELD_MASK;
        config.ook_peak_thresh_dec = value & RF_OOKPEAK_FIELD_MASK;
    }
    Ok(true)
}

fn encode_ook_average(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let filt = field("ook_average_thresh_filt", config.ook_average_thresh_filt, 0x03)?;
    regs.insert(REG_OOKAVG, filt << RF_OOKAVG_THRESHFILT_SHIFT);
    Ok(())
}

fn decode_ook_average(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_OOKAVG) else {
        return Ok(false);
    };
    let reserved = value & ((1 << RF_OOKAVG_THRESHFILT_SHIFT) - 1);
    if reserved != 0 {
        return Err(RegCalcError::decode(REG_OOKAVG, "OokAvgReserved", reserved));
    }
    config.ook_average_thresh_filt = value >> RF_OOKAVG_THRESHFILT_SHIFT;
    Ok(true)
}

fn encode_ook_fixed(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let value = match config.ook_thresh_type {
        OokThresholdType::Fixed => config.ook_fixed_thresh,
        _ => config.ook_peak_thresh_floor,
    };
    regs.insert(REG_OOKFIX, value);
    Ok(())
}

/// RegOokFix holds the fixed threshold or the peak floor, depending on the
/// threshold type in effect.
fn decode_ook_fixed(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_OOKFIX) else {
        return Ok(false);
    };
    match config.ook_thresh_type {
        OokThresholdType::Fixed => config.ook_fixed_thresh = value,
        OokThresholdType::Peak => config.ook_peak_thresh_floor = value,
        OokThresholdType::Average => {
            config.ook_fixed_thresh = value;
            config.ook_peak_thresh_floor = value;
        }
    }
    Ok(true)
}

fn encode_afc_fei(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut flags = AfcFeiFlags::empty();
    flags.set(AfcFeiFlags::AFC_AUTO_ON, config.afc_auto_on);
    flags.set(AfcFeiFlags::AFC_AUTOCLEAR_ON, config.afc_auto_clear_on);
    regs.insert(REG_AFCFEI, RF_AFCFEI_BASE | flags.bits());
    Ok(())
}

fn decode_afc_fei(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_AFCFEI) else {
        return Ok(false);
    };
    let flags = AfcFeiFlags::from_bits_truncate(value);
    config.afc_auto_on = flags.contains(AfcFeiFlags::AFC_AUTO_ON);
    config.afc_auto_clear_on = flags.contains(AfcFeiFlags::AFC_AUTOCLEAR_ON);
    Ok(true)
}

fn encode_rssi_threshold(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let value = convert::rssi_reg_value(config.rssi_threshold)
        .map_err(|e| as_constraint("rssi_threshold", e))?;
    regs.insert(REG_RSSITHRESH, value);
    Ok(())
}

fn decode_rssi_threshold(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_RSSITHRESH) else {
        return Ok(false);
    };
    config.rssi_threshold = convert::rssi_dbm(value);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(groups: &[&RegisterGroup], config: &RadioConfig) -> Result<RegisterMap> {
        let ctx = CodecContext::for_config(config);
        let mut regs = RegisterMap::new();
        for group in groups {
            if (group.applies)(config) {
                (group.encode)(config, &ctx, &mut regs)?;
            }
        }
        Ok(regs)
    }

    fn decode(groups: &[&RegisterGroup], regs: &[(u8, u8)], prior: &RadioConfig) -> Result<RadioConfig> {
        let mut config = prior.clone();
        let ctx = CodecContext::for_config(prior);
        let map: RegisterMap = regs.iter().copied().collect();
        for group in groups {
            (group.decode)(&map, &ctx, &mut config)?;
        }
        Ok(config)
    }

    const OOK_GROUPS: [&RegisterGroup; 3] = [&OOK_PEAK, &OOK_AVERAGE, &OOK_FIXED];

    #[test]
    fn test_lna() {
        let config = RadioConfig {
            lna_gain: 3,
            lna_zin: LnaImpedance::Ohm200,
            ..RadioConfig::default()
        };
        assert_eq!(encode(&[&LNA], &config).unwrap().get(0x18), Some(0x8B));

        let bad = RadioConfig {
            lna_gain: 7,
            ..RadioConfig::default()
        };
        assert!(encode(&[&LNA], &bad).is_err());
        let err = decode(&[&LNA], &[(0x18, 0x0F)], &RadioConfig::default()).unwrap_err();
        assert!(matches!(err, RegCalcError::DecodeError { register: 0x18, .. }));
    }

    #[test]
    fn test_bandwidth_fields() {
        let config = RadioConfig {
            rx_bw: Bandwidth::new(24, 5, 2),
            ..RadioConfig::default()
        };
        let regs = encode(&[&RX_BANDWIDTH, &AFC_BANDWIDTH], &config).unwrap();
        assert_eq!(regs.get(0x19), Some(0x55));
        assert_eq!(regs.get(0x1A), Some(0x8A));

        let decoded = decode(&[&RX_BANDWIDTH], &[(0x19, 0x55)], &RadioConfig::default()).unwrap();
        assert_eq!(decoded.rx_bw, Bandwidth::new(24, 5, 2));

        let err = decode(&[&AFC_BANDWIDTH], &[(0x1A, 0x18)], &RadioConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RegCalcError::DecodeError { register: 0x1A, field: "RxBwMant", value: 3 }
        ));

        let bad = RadioConfig {
            rx_bw: Bandwidth::new(18, 5, 2),
            ..RadioConfig::default()
        };
        assert!(matches!(
            encode(&[&RX_BANDWIDTH], &bad),
            Err(RegCalcError::ConstraintViolation { field: "rx_bw", .. })
        ));
    }

    #[test]
    fn test_ook_registers_follow_threshold_type() {
        let fsk = RadioConfig::default();
        assert!(encode(&OOK_GROUPS, &fsk).unwrap().is_empty());

        let peak = RadioConfig {
            modulation: Modulation::Ook,
            ook_peak_thresh_step: 2,
            ook_peak_thresh_dec: 1,
            ook_peak_thresh_floor: 12,
            ..RadioConfig::default()
        };
        let regs = encode(&OOK_GROUPS, &peak).unwrap();
        assert_eq!(regs.get(0x1B), Some(0x40 | 0x10 | 0x01));
        assert_eq!(regs.get(0x1C), None);
        assert_eq!(regs.get(0x1D), Some(12));

        let average = RadioConfig {
            ook_thresh_type: OokThresholdType::Average,
            ook_average_thresh_filt: 3,
            ..peak.clone()
        };
        let regs = encode(&OOK_GROUPS, &average).unwrap();
        assert_eq!(regs.get(0x1B), Some(0x80));
        assert_eq!(regs.get(0x1C), Some(0xC0));
        assert_eq!(regs.get(0x1D), None);

        let fixed = RadioConfig {
            ook_thresh_type: OokThresholdType::Fixed,
            ook_fixed_thresh: 30,
            ..peak
        };
        let regs = encode(&OOK_GROUPS, &fixed).unwrap();
        assert_eq!(regs.get(0x1B), Some(0x00));
        assert_eq!(regs.get(0x1D), Some(30));

        let decoded = decode(&OOK_GROUPS, &[(0x1B, 0x00), (0x1D, 30)], &RadioConfig::default()).unwrap();
        assert_eq!(decoded.ook_thresh_type, OokThresholdType::Fixed);
        assert_eq!(decoded.ook_fixed_thresh, 30);
        assert_eq!(decoded.ook_peak_thresh_floor, 6);
    }

    #[test]
    fn test_ook_threshold_type_reserved() {
        let err = decode(&OOK_GROUPS, &[(0x1B, 0xC0)], &RadioConfig::default()).unwrap_err();
        assert!(matches!(err, RegCalcError::DecodeError { register: 0x1B, value: 3, .. }));
    }

    #[test]
    fn test_afc_fei_and_rssi() {
        let config = RadioConfig {
            afc_auto_on: true,
            afc_auto_clear_on: true,
            rssi_threshold: -100.0,
            ..RadioConfig::default()
        };
        let regs = encode(&[&AFC_FEI, &RSSI_THRESHOLD], &config).unwrap();
        assert_eq!(regs.get(0x1E), Some(0x1C));
        assert_eq!(regs.get(0x29), Some(200));

        let decoded = decode(&[&AFC_FEI, &RSSI_THRESHOLD], &[(0x1E, 0x14), (0x29, 0xE4)], &RadioConfig::default())
            .unwrap();
        assert!(decoded.afc_auto_on);
        assert!(!decoded.afc_auto_clear_on);
        assert_eq!(decoded.rssi_threshold, -114.0);
    }
}
