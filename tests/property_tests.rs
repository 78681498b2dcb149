//! Property-based tests for the converters and the register codec.

use proptest::prelude::*;
use sx1231_regcalc::convert::{
    carrier_hz, carrier_reg_value, frequency_step, rx_bandwidth_hz, rssi_dbm, rssi_reg_value,
};
use sx1231_regcalc::{
    decode_registers, encode_config, export_config, export_diff, import_registers, Bandwidth,
    PorDefaults, RadioConfig, RegisterMap,
};

const FXO: f64 = 32e6;

/// Carrier frequencies of whole kHz in the 862-1020 MHz band
fn carrier_strategy() -> impl Strategy<Value = u32> {
    (862_000u32..=1_020_000).prop_map(|khz| khz * 1000)
}

/// Configurations whose emitted fields survive an encode/decode cycle exactly
fn exact_config_strategy() -> impl Strategy<Value = RadioConfig> {
    (
        (863u32..=1019).prop_map(|mhz| mhz * 1_000_000),
        prop::sample::select(vec![4_000u32, 10_000, 50_000, 100_000, 200_000]),
        -18i8..=17,
        prop::sample::select(vec![16u8, 20, 24]),
        0u8..=7,
        0u8..=7,
        1u8..=8,
        prop::collection::vec(1u8..=255, 8),
        0u8..=200,
        0u8..=255,
    )
        .prop_map(
            |(carrier, bit_rate, power, mant, exp, dcc, sync_size, sync, msg_len, rssi)| {
                RadioConfig {
                    carrier_freq: carrier,
                    bit_rate,
                    // 512 frequency steps, 31250 Hz exactly
                    fdev: 31_250,
                    pa_pin: sx1231_regcalc::PaPin::Pa1,
                    pa_power: power,
                    rx_bw: Bandwidth::new(mant, exp, dcc),
                    sync_size,
                    sync_value: sync[..usize::from(sync_size)].to_vec(),
                    payload_msg_len: msg_len.max(1),
                    rssi_threshold: rssi_dbm(rssi),
                    ..RadioConfig::default()
                }
            },
        )
        .prop_filter("modulation index within 0.5..=10", |c| {
            (0.5..=10.0).contains(&c.modulation_index())
        })
}

proptest! {
    #[test]
    fn prop_carrier_register_within_half_step(freq in carrier_strategy()) {
        let fstep = frequency_step(FXO);
        let value = carrier_reg_value(f64::from(freq), fstep).unwrap();
        prop_assert!((carrier_hz(value, fstep) - f64::from(freq)).abs() <= fstep / 2.0);
    }

    #[test]
    fn prop_rssi_round_trip(raw in 0u8..=255) {
        prop_assert_eq!(rssi_reg_value(rssi_dbm(raw)).unwrap(), raw);
    }

    #[test]
    fn prop_bandwidth_decreases_with_exponent(mant in prop::sample::select(vec![16u8, 20, 24]), exp in 0u8..7) {
        let wide = rx_bandwidth_hz(FXO, mant, exp).unwrap();
        let narrow = rx_bandwidth_hz(FXO, mant, exp + 1).unwrap();
        prop_assert_eq!(wide, narrow * 2.0);
    }

    #[test]
    fn prop_encode_decode_round_trip(config in exact_config_strategy()) {
        let regs = encode_config(&config).unwrap();
        let decoded = decode_registers(&regs, &RadioConfig::default()).unwrap();
        prop_assert_eq!(decoded, config);
    }

    #[test]
    fn prop_export_is_idempotent_and_a_fixed_point(config in exact_config_strategy()) {
        let por = PorDefaults::map();
        let first = export_config(&config).unwrap();
        prop_assert_eq!(export_diff(&first, &por), first.clone());

        let imported = import_registers(&first, &RadioConfig::default()).unwrap();
        prop_assert_eq!(export_config(&imported).unwrap(), first);
    }

    #[test]
    fn prop_frequency_group_all_or_nothing(config in exact_config_strategy()) {
        let diff = export_config(&config).unwrap();
        let present = [0x07u8, 0x08, 0x09].iter().filter(|&&a| diff.contains(a)).count();
        prop_assert!(present == 0 || present == 3);
    }

    #[test]
    fn prop_decode_never_panics(pairs in prop::collection::vec((0u8..=0x7F, any::<u8>()), 0..40)) {
        let regs: RegisterMap = pairs.into_iter().collect();
        let _ = decode_registers(&regs, &RadioConfig::default());
    }
}
