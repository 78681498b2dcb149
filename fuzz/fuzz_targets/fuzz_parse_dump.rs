#![no_main]

use libfuzzer_sys::fuzz_target;
use sx1231_regcalc::{import_dump, RadioConfig, RegisterMap};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must print back to an equivalent map
    if let Ok(regs) = RegisterMap::parse_dump(text) {
        let reparsed = RegisterMap::parse_dump(&regs.to_dump());
        assert_eq!(reparsed.ok(), Some(regs));
    }

    let _ = import_dump(text, &RadioConfig::default());
});
