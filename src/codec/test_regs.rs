//! Test registers: sensitivity boost, TCXO input, DAGC and low-beta AFC offset

use super::{always, as_constraint, CodecContext, RegisterGroup};
use crate::config::RadioConfig;
use crate::convert;
use crate::error::Result;
use crate::register_map::RegisterMap;
use crate::registers::*;

pub(super) const TEST_LNA: RegisterGroup = RegisterGroup {
    name: "test_lna",
    addresses: &[REG_TESTLNA],
    applies: always,
    encode: encode_test_lna,
    decode: decode_test_lna,
};

pub(super) const TEST_TCXO: RegisterGroup = RegisterGroup {
    name: "test_tcxo",
    addresses: &[REG_TESTTCXO],
    applies: always,
    encode: encode_test_tcxo,
    decode: decode_test_tcxo,
};

pub(super) const TEST_DAGC: RegisterGroup = RegisterGroup {
    name: "test_dagc",
    addresses: &[REG_TESTDAGC],
    applies: always,
    encode: encode_test_dagc,
    decode: decode_test_dagc,
};

pub(super) const TEST_AFC: RegisterGroup = RegisterGroup {
    name: "test_afc",
    addresses: &[REG_TESTAFC],
    applies: RadioConfig::low_beta_afc_active,
    encode: encode_test_afc,
    decode: decode_test_afc,
};

fn encode_test_lna(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let value = if config.sensitivity_boost {
        RF_TESTLNA_HIGH_SENSITIVITY
    } else {
        RF_TESTLNA_NORMAL
    };
    regs.insert(REG_TESTLNA, value);
    Ok(())
}

fn decode_test_lna(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_TESTLNA) else {
        return Ok(false);
    };
    config.sensitivity_boost = value == RF_TESTLNA_HIGH_SENSITIVITY;
    Ok(true)
}

fn encode_test_tcxo(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut value = RF_TESTTCXO_BASE;
    if config.tcxo_input_on {
        value |= RF_TESTTCXO_INPUT_ON;
    }
    regs.insert(REG_TESTTCXO, value);
    Ok(())
}

fn decode_test_tcxo(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_TESTTCXO) else {
        return Ok(false);
    };
    config.tcxo_input_on = value & RF_TESTTCXO_INPUT_ON != 0;
    Ok(true)
}

fn encode_test_dagc(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let value = match (config.dagc_on, config.low_beta_afc_active()) {
        (false, _) => RF_DAGC_OFF,
        (true, true) => RF_DAGC_IMPROVED_LOWBETA1,
        (true, false) => RF_DAGC_IMPROVED_LOWBETA0,
    };
    regs.insert(REG_TESTDAGC, value);
    Ok(())
}

fn decode_test_dagc(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_TESTDAGC) else {
        return Ok(false);
    };
    config.dagc_on = value != RF_DAGC_OFF;
    Ok(true)
}

fn encode_test_afc(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let value = convert::afc_offset_reg_value(f64::from(config.low_beta_afc_offset))
        .map_err(|e| as_constraint("low_beta_afc_offset", e))?;
    regs.insert(REG_TESTAFC, value);
    Ok(())
}

fn decode_test_afc(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_TESTAFC) else {
        return Ok(false);
    };
    config.low_beta_afc_offset = convert::afc_offset_hz(value) as i32;
    Ok(true)
}
