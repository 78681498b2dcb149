//! Modem registers: data modulation, bit rate, deviation, carrier and AFC control

use super::{always, as_constraint, field, fsk_only, CodecContext, RegisterGroup};
use crate::config::{DataMode, Modulation, RadioConfig};
use crate::convert;
use crate::error::{RegCalcError, Result};
use crate::register_map::RegisterMap;
use crate::registers::*;

pub(super) const DATA_MODULATION: RegisterGroup = RegisterGroup {
    name: "data_modulation",
    addresses: &[REG_DATAMODUL],
    applies: always,
    encode: encode_data_modulation,
    decode: decode_data_modulation,
};

pub(super) const BIT_RATE: RegisterGroup = RegisterGroup {
    name: "bit_rate",
    addresses: &[REG_BITRATEMSB, REG_BITRATELSB],
    applies: always,
    encode: encode_bit_rate,
    decode: decode_bit_rate,
};

pub(super) const FREQUENCY_DEVIATION: RegisterGroup = RegisterGroup {
    name: "frequency_deviation",
    addresses: &[REG_FDEVMSB, REG_FDEVLSB],
    applies: fsk_only,
    encode: encode_frequency_deviation,
    decode: decode_frequency_deviation,
};

/// RegFrf is latched when the LSB is written, so the three bytes travel together
pub(super) const CARRIER_FREQUENCY: RegisterGroup = RegisterGroup {
    name: "carrier_frequency",
    addresses: &[REG_FRFMSB, REG_FRFMID, REG_FRFLSB],
    applies: always,
    encode: encode_carrier_frequency,
    decode: decode_carrier_frequency,
};

pub(super) const AFC_CONTROL: RegisterGroup = RegisterGroup {
    name: "afc_control",
    addresses: &[REG_AFCCTRL],
    applies: always,
    encode: encode_afc_control,
    decode: decode_afc_control,
};

fn max_shaping(modulation: Modulation) -> u8 {
    match modulation {
        Modulation::Fsk => 3,
        Modulation::Ook => 2,
    }
}

fn encode_data_modulation(
    config: &RadioConfig,
    _ctx: &CodecContext,
    regs: &mut RegisterMap,
) -> Result<()> {
    let shaping = field(
        "modulation_shaping",
        config.modulation_shaping,
        max_shaping(config.modulation),
    )?;
    let data_mode = match (config.data_mode, config.bit_sync_on) {
        (DataMode::Packet, _) => RF_DATAMODUL_DATAMODE_PACKET,
        (DataMode::Continuous, true) => RF_DATAMODUL_DATAMODE_CONTINUOUS,
        (DataMode::Continuous, false) => RF_DATAMODUL_DATAMODE_CONTINUOUS_NOBSYNC,
    };
    let modulation = match config.modulation {
        Modulation::Fsk => RF_DATAMODUL_MODULATIONTYPE_FSK,
        Modulation::Ook => RF_DATAMODUL_MODULATIONTYPE_OOK,
    };

    regs.insert(
        REG_DATAMODUL,
        (data_mode << RF_DATAMODUL_DATAMODE_SHIFT)
            | (modulation << RF_DATAMODUL_MODULATIONTYPE_SHIFT)
            | shaping,
    );
    Ok(())
}

fn decode_data_modulation(
    regs: &RegisterMap,
    _ctx: &CodecContext,
    config: &mut RadioConfig,
) -> Result<bool> {
    let Some(value) = regs.get(REG_DATAMODUL) else {
        return Ok(false);
    };

    let modulation = match (value >> RF_DATAMODUL_MODULATIONTYPE_SHIFT) & 0x03 {
        RF_DATAMODUL_MODULATIONTYPE_FSK => Modulation::Fsk,
        RF_DATAMODUL_MODULATIONTYPE_OOK => Modulation::Ook,
        code => return Err(RegCalcError::decode(REG_DATAMODUL, "ModulationType", code)),
    };

    let shaping = value & RF_DATAMODUL_SHAPING_MASK;
    if shaping > max_shaping(modulation) {
        return Err(RegCalcError::decode(
            REG_DATAMODUL,
            "ModulationShaping",
            shaping,
        ));
    }

    match (value >> RF_DATAMODUL_DATAMODE_SHIFT) & 0x03 {
        RF_DATAMODUL_DATAMODE_PACKET => config.data_mode = DataMode::Packet,
        RF_DATAMODUL_DATAMODE_CONTINUOUS => {
            config.data_mode = DataMode::Continuous;
            config.bit_sync_on = true;
        }
        RF_DATAMODUL_DATAMODE_CONTINUOUS_NOBSYNC => {
            config.data_mode = DataMode::Continuous;
            config.bit_sync_on = false;
        }
        code => return Err(RegCalcError::decode(REG_DATAMODUL, "DataMode", code)),
    }

    config.modulation = modulation;
    config.modulation_shaping = shaping;
    Ok(true)
}

fn encode_bit_rate(config: &RadioConfig, ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let divisor = convert::bit_rate_reg_value(ctx.fxo, f64::from(config.bit_rate))?;
    let [msb, lsb] = divisor.to_be_bytes();
    regs.insert(REG_BITRATEMSB, msb);
    regs.insert(REG_BITRATELSB, lsb);
    Ok(())
}

fn decode_bit_rate(regs: &RegisterMap, ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(bytes) = regs.get_block::<2>(REG_BITRATEMSB) else {
        return Ok(false);
    };
    let divisor = u16::from_be_bytes(bytes);
    if divisor == 0 {
        return Err(RegCalcError::decode(REG_BITRATEMSB, "BitRate", 0));
    }
    config.bit_rate = convert::bit_rate_hz(ctx.fxo, divisor)?.round() as u32;
    Ok(true)
}

fn encode_frequency_deviation(
    config: &RadioConfig,
    ctx: &CodecContext,
    regs: &mut RegisterMap,
) -> Result<()> {
    let value = convert::freq_dev_reg_value(f64::from(config.fdev), ctx.fstep)
        .map_err(|e| as_constraint("fdev", e))?;
    let [msb, lsb] = value.to_be_bytes();
    regs.insert(REG_FDEVMSB, msb & RF_FDEVMSB_MASK);
    regs.insert(REG_FDEVLSB, lsb);
    Ok(())
}

fn decode_frequency_deviation(
    regs: &RegisterMap,
    ctx: &CodecContext,
    config: &mut RadioConfig,
) -> Result<bool> {
    let Some([msb, lsb]) = regs.get_block::<2>(REG_FDEVMSB) else {
        return Ok(false);
    };
    if msb & !RF_FDEVMSB_MASK != 0 {
        return Err(RegCalcError::decode(REG_FDEVMSB, "Fdev", msb));
    }
    let value = u16::from_be_bytes([msb, lsb]);
    config.fdev = convert::freq_dev_hz(value, ctx.fstep).round() as u32;
    Ok(true)
}

fn encode_carrier_frequency(
    config: &RadioConfig,
    ctx: &CodecContext,
    regs: &mut RegisterMap,
) -> Result<()> {
    let value = convert::carrier_reg_value(f64::from(config.carrier_freq), ctx.fstep)
        .map_err(|e| as_constraint("carrier_freq", e))?;
    let [msb, mid, lsb] = convert::carrier_bytes(value);
    regs.insert(REG_FRFMSB, msb);
    regs.insert(REG_FRFMID, mid);
    regs.insert(REG_FRFLSB, lsb);
    Ok(())
}

fn decode_carrier_frequency(
    regs: &RegisterMap,
    ctx: &CodecContext,
    config: &mut RadioConfig,
) -> Result<bool> {
    let Some([msb, mid, lsb]) = regs.get_block::<3>(REG_FRFMSB) else {
        return Ok(false);
    };
    let value = u32::from_be_bytes([0, msb, mid, lsb]);
    config.carrier_freq = convert::carrier_hz(value, ctx.fstep).round() as u32;
    Ok(true)
}

fn encode_afc_control(
    config: &RadioConfig,
    _ctx: &CodecContext,
    regs: &mut RegisterMap,
) -> Result<()> {
    let value = if config.low_beta_afc_active() {
        RF_AFCCTRL_LOWBETA_ON
    } else {
        0
    };
    regs.insert(REG_AFCCTRL, value);
    Ok(())
}

fn decode_afc_control(
    regs: &RegisterMap,
    _ctx: &CodecContext,
    config: &mut RadioConfig,
) -> Result<bool> {
    let Some(value) = regs.get(REG_AFCCTRL) else {
        return Ok(false);
    };
    config.afc_low_beta_on = value & RF_AFCCTRL_LOWBETA_ON != 0;
    Ok(true)
}
