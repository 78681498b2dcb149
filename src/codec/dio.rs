//! DIO pin mapping and CLKOUT
//!
//! The chip has one mapping per pin, but the meaning of each code depends on
//! the data mode. The configuration keeps a table per data mode, and the
//! table used here is the one of the data mode in effect.

use super::{always, field, CodecContext, RegisterGroup};
use crate::config::RadioConfig;
use crate::error::Result;
use crate::register_map::RegisterMap;
use crate::registers::*;

pub(super) const DIO_MAPPING_1: RegisterGroup = RegisterGroup {
    name: "dio_mapping_1",
    addresses: &[REG_DIOMAPPING1],
    applies: always,
    encode: encode_dio_mapping_1,
    decode: decode_dio_mapping_1,
};

pub(super) const DIO_MAPPING_2: RegisterGroup = RegisterGroup {
    name: "dio_mapping_2",
    addresses: &[REG_DIOMAPPING2],
    applies: always,
    encode: encode_dio_mapping_2,
    decode: decode_dio_mapping_2,
};

const DIO_NAMES: [&str; 6] = ["dio0", "dio1", "dio2", "dio3", "dio4", "dio5"];

const DIO_CODE_MAX: u8 = 0x03;

/// Pack mapping codes two bits each, first pin in the top bits.
fn pack(config: &RadioConfig, pins: std::ops::Range<usize>) -> Result<u8> {
    let mut value = 0u8;
    for pin in pins {
        let code = field(DIO_NAMES[pin], config.active_dio()[pin], DIO_CODE_MAX)?;
        value = (value << 2) | code;
    }
    Ok(value)
}

fn encode_dio_mapping_1(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_DIOMAPPING1, pack(config, 0..4)?);
    Ok(())
}

fn decode_dio_mapping_1(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_DIOMAPPING1) else {
        return Ok(false);
    };
    let dio = config.active_dio_mut();
    for (pin, slot) in dio[..4].iter_mut().enumerate() {
        *slot = (value >> (6 - 2 * pin)) & DIO_CODE_MAX;
    }
    Ok(true)
}

fn encode_dio_mapping_2(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let clk_out = field("clk_out", config.clk_out, RF_DIOMAPPING2_CLKOUT_MASK)?;
    regs.insert(REG_DIOMAPPING2, (pack(config, 4..6)? << 4) | clk_out);
    Ok(())
}

fn decode_dio_mapping_2(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_DIOMAPPING2) else {
        return Ok(false);
    };
    let dio = config.active_dio_mut();
    dio[4] = (value >> 6) & DIO_CODE_MAX;
    dio[5] = (value >> 4) & DIO_CODE_MAX;
    config.clk_out = value & RF_DIOMAPPING2_CLKOUT_MASK;
    Ok(true)
}
