#![no_main]

use libfuzzer_sys::fuzz_target;
use sx1231_regcalc::{decode_registers, export_config, RadioConfig, RegisterMap};

fuzz_target!(|data: &[u8]| {
    // Pairs of (address, value), the address folded into the register space
    let regs: RegisterMap = data
        .chunks_exact(2)
        .map(|pair| (pair[0] & 0x7F, pair[1]))
        .collect();

    // Decoded configurations may still break cross-field rules, so only panics matter
    if let Ok(config) = decode_registers(&regs, &RadioConfig::default()) {
        let _ = export_config(&config);
    }
});
