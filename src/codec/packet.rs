//! Packet engine registers (0x2C-0x4D), only written in packet mode

use zeroize::Zeroize;

use super::{field, packet_mode, CodecContext, RegisterGroup};
use crate::config::{
    AddressFiltering, AesKey, Encoding, FifoFillCondition, PacketFormat, RadioConfig,
    TxStartCondition,
};
use crate::error::{RegCalcError, Result};
use crate::register_map::RegisterMap;
use crate::registers::*;

const fn address_block<const N: usize>(start: u8) -> [u8; N] {
    let mut block = [0u8; N];
    let mut i = 0;
    while i < N {
        block[i] = start + i as u8;
        i += 1;
    }
    block
}

const SYNC_VALUE_ADDRESSES: [u8; SYNC_VALUE_LEN] = address_block(REG_SYNCVALUE1);
const AES_KEY_ADDRESSES: [u8; AES_KEY_LEN] = address_block(REG_AESKEY1);

pub(super) const PREAMBLE: RegisterGroup = RegisterGroup {
    name: "preamble",
    addresses: &[REG_PREAMBLEMSB, REG_PREAMBLELSB],
    applies: packet_mode,
    encode: encode_preamble,
    decode: decode_preamble,
};

pub(super) const SYNC_CONFIG: RegisterGroup = RegisterGroup {
    name: "sync_config",
    addresses: &[REG_SYNCCONFIG],
    applies: packet_mode,
    encode: encode_sync_config,
    decode: decode_sync_config,
};

pub(super) const SYNC_VALUE: RegisterGroup = RegisterGroup {
    name: "sync_value",
    addresses: &SYNC_VALUE_ADDRESSES,
    applies: sync_word_on,
    encode: encode_sync_value,
    decode: decode_sync_value,
};

pub(super) const PACKET_CONFIG_1: RegisterGroup = RegisterGroup {
    name: "packet_config_1",
    addresses: &[REG_PACKETCONFIG1],
    applies: packet_mode,
    encode: encode_packet_config_1,
    decode: decode_packet_config_1,
};

pub(super) const PAYLOAD_LENGTH: RegisterGroup = RegisterGroup {
    name: "payload_length",
    addresses: &[REG_PAYLOADLENGTH],
    applies: packet_mode,
    encode: encode_payload_length,
    decode: decode_payload_length,
};

pub(super) const NODE_ADDRESS: RegisterGroup = RegisterGroup {
    name: "node_address",
    addresses: &[REG_NODEADRS],
    applies: node_address_used,
    encode: encode_node_address,
    decode: decode_node_address,
};

pub(super) const BROADCAST_ADDRESS: RegisterGroup = RegisterGroup {
    name: "broadcast_address",
    addresses: &[REG_BROADCASTADRS],
    applies: broadcast_address_used,
    encode: encode_broadcast_address,
    decode: decode_broadcast_address,
};

pub(super) const AUTO_MODES: RegisterGroup = RegisterGroup {
    name: "auto_modes",
    addresses: &[REG_AUTOMODES],
    applies: auto_modes_on,
    encode: encode_auto_modes,
    decode: decode_auto_modes,
};

pub(super) const FIFO_THRESHOLD: RegisterGroup = RegisterGroup {
    name: "fifo_threshold",
    addresses: &[REG_FIFOTHRESH],
    applies: packet_mode,
    encode: encode_fifo_threshold,
    decode: decode_fifo_threshold,
};

pub(super) const PACKET_CONFIG_2: RegisterGroup = RegisterGroup {
    name: "packet_config_2",
    addresses: &[REG_PACKETCONFIG2],
    applies: packet_mode,
    encode: encode_packet_config_2,
    decode: decode_packet_config_2,
};

pub(super) const AES_KEY: RegisterGroup = RegisterGroup {
    name: "aes_key",
    addresses: &AES_KEY_ADDRESSES,
    applies: aes_key_used,
    encode: encode_aes_key,
    decode: decode_aes_key,
};

fn sync_word_on(config: &RadioConfig) -> bool {
    packet_mode(config) && config.sync_on
}

fn node_address_used(config: &RadioConfig) -> bool {
    packet_mode(config) && config.effective_address_filtering().is_enabled()
}

fn broadcast_address_used(config: &RadioConfig) -> bool {
    packet_mode(config)
        && config.effective_address_filtering() == AddressFiltering::NodeOrBroadcast
}

fn auto_modes_on(config: &RadioConfig) -> bool {
    packet_mode(config) && config.auto_modes_on
}

fn aes_key_used(config: &RadioConfig) -> bool {
    packet_mode(config) && config.aes_active()
}

fn encode_preamble(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let [msb, lsb] = config.preamble_size.to_be_bytes();
    regs.insert(REG_PREAMBLEMSB, msb);
    regs.insert(REG_PREAMBLELSB, lsb);
    Ok(())
}

fn decode_preamble(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(bytes) = regs.get_block::<2>(REG_PREAMBLEMSB) else {
        return Ok(false);
    };
    config.preamble_size = u16::from_be_bytes(bytes);
    Ok(true)
}

fn encode_sync_config(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut value = if config.sync_on {
        if !(1..=SYNC_VALUE_LEN as u8).contains(&config.sync_size) {
            return Err(RegCalcError::constraint(
                "sync_size",
                format!("{} bytes is outside 1..=8", config.sync_size),
            ));
        }
        let tol = field("sync_tol", config.sync_tol, RF_SYNC_FIELD_MASK)?;
        SyncConfigFlags::SYNC_ON.bits() | ((config.sync_size - 1) << RF_SYNC_SIZE_SHIFT) | tol
    } else {
        RF_SYNC_OFF
    };
    if config.fifo_fill_condition == FifoFillCondition::Always {
        value |= SyncConfigFlags::FIFO_FILL_CONDITION.bits();
    }
    regs.insert(REG_SYNCCONFIG, value);
    Ok(())
}

fn decode_sync_config(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_SYNCCONFIG) else {
        return Ok(false);
    };
    let flags = SyncConfigFlags::from_bits_truncate(value);
    config.sync_on = flags.contains(SyncConfigFlags::SYNC_ON);
    config.fifo_fill_condition = if flags.contains(SyncConfigFlags::FIFO_FILL_CONDITION) {
        FifoFillCondition::Always
    } else {
        FifoFillCondition::SyncAddress
    };
    if config.sync_on {
        config.sync_size = 1 + ((value >> RF_SYNC_SIZE_SHIFT) & RF_SYNC_FIELD_MASK);
        config.sync_tol = value & RF_SYNC_FIELD_MASK;
    }
    Ok(true)
}

fn encode_sync_value(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let size = usize::from(config.sync_size);
    if config.sync_value.len() != size {
        return Err(RegCalcError::constraint(
            "sync_value",
            format!(
                "{} bytes given for a {size} byte sync word",
                config.sync_value.len()
            ),
        ));
    }
    if let Some(pos) = config.sync_value.iter().position(|&b| b == 0x00) {
        return Err(RegCalcError::constraint(
            "sync_value",
            format!("byte {} is 0x00, which the sync word cannot contain", pos + 1),
        ));
    }

    for (&addr, &byte) in SYNC_VALUE_ADDRESSES.iter().zip(&config.sync_value) {
        regs.insert(addr, byte);
    }
    Ok(())
}

/// Sync word bytes missing from the dump keep the prior byte at that position,
/// so the word always matches the declared size when the prior covers it.
/// The group only counts as decoded when the whole declared word is present.
fn decode_sync_value(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    if !config.sync_on {
        return Ok(false);
    }
    let size = usize::from(config.sync_size).min(SYNC_VALUE_LEN);
    let declared = &SYNC_VALUE_ADDRESSES[..size];
    let merged: Option<Vec<u8>> = declared
        .iter()
        .enumerate()
        .map(|(pos, &addr)| regs.get(addr).or_else(|| config.sync_value.get(pos).copied()))
        .collect();
    if let Some(value) = merged {
        config.sync_value = value;
    }
    Ok(declared.iter().all(|&addr| regs.contains(addr)))
}

fn encode_packet_config_1(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut flags = PacketConfig1Flags::empty();
    flags.set(
        PacketConfig1Flags::VARIABLE_LENGTH,
        config.packet_format == PacketFormat::Variable,
    );
    flags.set(PacketConfig1Flags::CRC_ON, config.crc_on);
    flags.set(
        PacketConfig1Flags::CRC_AUTO_CLEAR_OFF,
        config.crc_auto_clear_off_active(),
    );

    let value = flags.bits()
        | (config.effective_encoding().code() << RF_PACKET1_DCFREE_SHIFT)
        | (config.effective_address_filtering().code() << RF_PACKET1_ADRSFILTERING_SHIFT);
    regs.insert(REG_PACKETCONFIG1, value);
    Ok(())
}

fn decode_packet_config_1(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_PACKETCONFIG1) else {
        return Ok(false);
    };

    let code = (value >> RF_PACKET1_DCFREE_SHIFT) & RF_PACKET1_FIELD_MASK;
    let encoding = Encoding::from_code(code)
        .ok_or_else(|| RegCalcError::decode(REG_PACKETCONFIG1, "DcFree", code))?;
    let code = (value >> RF_PACKET1_ADRSFILTERING_SHIFT) & RF_PACKET1_FIELD_MASK;
    let address_filtering = AddressFiltering::from_code(code)
        .ok_or_else(|| RegCalcError::decode(REG_PACKETCONFIG1, "AddressFiltering", code))?;

    let flags = PacketConfig1Flags::from_bits_truncate(value);
    config.encoding = encoding;
    config.address_filtering = address_filtering;
    config.crc_on = flags.contains(PacketConfig1Flags::CRC_ON);
    config.crc_auto_clear_off = flags.contains(PacketConfig1Flags::CRC_AUTO_CLEAR_OFF);
    config.packet_format = if flags.contains(PacketConfig1Flags::VARIABLE_LENGTH) {
        PacketFormat::Variable
    } else if config.packet_format == PacketFormat::Unlimited {
        // told apart from fixed length by RegPayloadLength
        PacketFormat::Unlimited
    } else {
        PacketFormat::Fixed
    };
    Ok(true)
}

/// Length and address bytes counted by RegPayloadLength on top of the message
fn payload_prefix_len(config: &RadioConfig) -> u8 {
    u8::from(config.packet_format == PacketFormat::Variable)
        + u8::from(config.effective_address_filtering().is_enabled())
}

fn encode_payload_length(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    if config.packet_format == PacketFormat::Unlimited {
        regs.insert(REG_PAYLOADLENGTH, 0);
        return Ok(());
    }

    let length = config
        .payload_msg_len
        .checked_add(payload_prefix_len(config))
        .ok_or_else(|| {
            RegCalcError::constraint(
                "payload_msg_len",
                format!(
                    "{} bytes plus length and address bytes exceed 255",
                    config.payload_msg_len
                ),
            )
        })?;
    regs.insert(REG_PAYLOADLENGTH, length);
    Ok(())
}

/// A zero length in fixed length format means unlimited length.
fn decode_payload_length(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(raw) = regs.get(REG_PAYLOADLENGTH) else {
        return Ok(false);
    };

    if raw == 0 && config.packet_format != PacketFormat::Variable {
        config.packet_format = PacketFormat::Unlimited;
        return Ok(true);
    }
    if config.packet_format == PacketFormat::Unlimited {
        config.packet_format = PacketFormat::Fixed;
    }

    config.payload_msg_len = raw
        .checked_sub(payload_prefix_len(config))
        .ok_or_else(|| RegCalcError::decode(REG_PAYLOADLENGTH, "PayloadLength", raw))?;
    Ok(true)
}

fn encode_node_address(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_NODEADRS, config.node_address);
    Ok(())
}

fn decode_node_address(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_NODEADRS) else {
        return Ok(false);
    };
    config.node_address = value;
    Ok(true)
}

fn encode_broadcast_address(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    regs.insert(REG_BROADCASTADRS, config.broadcast_address);
    Ok(())
}

fn decode_broadcast_address(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_BROADCASTADRS) else {
        return Ok(false);
    };
    config.broadcast_address = value;
    Ok(true)
}

fn encode_auto_modes(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let modes = &config.auto_modes;
    let enter = field("enter_condition", modes.enter_condition, RF_AUTOMODES_CONDITION_MASK)?;
    let exit = field("exit_condition", modes.exit_condition, RF_AUTOMODES_CONDITION_MASK)?;
    let intermediate = field(
        "intermediate_mode",
        modes.intermediate_mode,
        RF_AUTOMODES_INTERMEDIATE_MASK,
    )?;
    regs.insert(
        REG_AUTOMODES,
        (enter << RF_AUTOMODES_ENTER_SHIFT) | (exit << RF_AUTOMODES_EXIT_SHIFT) | intermediate,
    );
    Ok(())
}

fn decode_auto_modes(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_AUTOMODES) else {
        return Ok(false);
    };
    let modes = &mut config.auto_modes;
    modes.enter_condition = (value >> RF_AUTOMODES_ENTER_SHIFT) & RF_AUTOMODES_CONDITION_MASK;
    modes.exit_condition = (value >> RF_AUTOMODES_EXIT_SHIFT) & RF_AUTOMODES_CONDITION_MASK;
    modes.intermediate_mode = value & RF_AUTOMODES_INTERMEDIATE_MASK;
    config.auto_modes_on =
        config.auto_modes.enter_condition != 0 && config.auto_modes.exit_condition != 0;
    Ok(true)
}

fn encode_fifo_threshold(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let mut value = field("fifo_threshold", config.fifo_threshold, RF_FIFOTHRESH_VALUE_MASK)?;
    if config.tx_start_condition == TxStartCondition::FifoNotEmpty {
        value |= RF_FIFOTHRESH_TXSTART_FIFONOTEMPTY;
    }
    regs.insert(REG_FIFOTHRESH, value);
    Ok(())
}

fn decode_fifo_threshold(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_FIFOTHRESH) else {
        return Ok(false);
    };
    config.tx_start_condition = if value & RF_FIFOTHRESH_TXSTART_FIFONOTEMPTY != 0 {
        TxStartCondition::FifoNotEmpty
    } else {
        TxStartCondition::FifoLevel
    };
    config.fifo_threshold = value & RF_FIFOTHRESH_VALUE_MASK;
    Ok(true)
}

fn encode_packet_config_2(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    let delay = field("inter_packet_rx_delay", config.inter_packet_rx_delay, 0x0F)?;
    let mut flags = PacketConfig2Flags::empty();
    flags.set(PacketConfig2Flags::AUTO_RX_RESTART_ON, config.auto_rx_restart_on);
    flags.set(PacketConfig2Flags::AES_ON, config.aes_active());
    regs.insert(
        REG_PACKETCONFIG2,
        (delay << RF_PACKET2_RXRESTARTDELAY_SHIFT) | flags.bits(),
    );
    Ok(())
}

fn decode_packet_config_2(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(value) = regs.get(REG_PACKETCONFIG2) else {
        return Ok(false);
    };
    let flags = PacketConfig2Flags::from_bits_truncate(value);
    config.inter_packet_rx_delay = value >> RF_PACKET2_RXRESTARTDELAY_SHIFT;
    config.auto_rx_restart_on = flags.contains(PacketConfig2Flags::AUTO_RX_RESTART_ON);
    config.aes_on = flags.contains(PacketConfig2Flags::AES_ON);
    Ok(true)
}

fn encode_aes_key(config: &RadioConfig, _ctx: &CodecContext, regs: &mut RegisterMap) -> Result<()> {
    for (&addr, &byte) in AES_KEY_ADDRESSES.iter().zip(config.aes_key.as_bytes()) {
        regs.insert(addr, byte);
    }
    Ok(())
}

fn decode_aes_key(regs: &RegisterMap, _ctx: &CodecContext, config: &mut RadioConfig) -> Result<bool> {
    let Some(mut key) = regs.get_block::<AES_KEY_LEN>(REG_AESKEY1) else {
        return Ok(false);
    };
    config.aes_key = AesKey::new(key);
    key.zeroize();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataMode;

    const PACKET_GROUPS: [&RegisterGroup; 11] = [
        &PREAMBLE,
        &SYNC_CONFIG,
        &SYNC_VALUE,
        &PACKET_CONFIG_1,
        &PAYLOAD_LENGTH,
        &NODE_ADDRESS,
        &BROADCAST_ADDRESS,
        &AUTO_MODES,
        &FIFO_THRESHOLD,
        &PACKET_CONFIG_2,
        &AES_KEY,
    ];

    fn encode(config: &RadioConfig) -> Result<RegisterMap> {
        let ctx = CodecContext::for_config(config);
        let mut regs = RegisterMap::new();
        for group in PACKET_GROUPS {
            if (group.applies)(config) {
                (group.encode)(config, &ctx, &mut regs)?;
            }
        }
        Ok(regs)
    }

    fn decode(regs: &RegisterMap, prior: &RadioConfig) -> Result<RadioConfig> {
        let ctx = CodecContext::for_config(prior);
        let mut config = prior.clone();
        for group in PACKET_GROUPS {
            (group.decode)(regs, &ctx, &mut config)?;
        }
        Ok(config)
    }

    #[test]
    fn test_address_blocks() {
        assert_eq!(SYNC_VALUE_ADDRESSES[7], 0x36);
        assert_eq!(AES_KEY_ADDRESSES[15], 0x4D);
    }

    #[test]
    fn test_continuous_mode_writes_no_packet_registers() {
        let config = RadioConfig {
            data_mode: DataMode::Continuous,
            ..RadioConfig::default()
        };
        assert!(encode(&config).unwrap().is_empty());
    }

    #[test]
    fn test_sync_config() {
        let config = RadioConfig {
            sync_size: 2,
            sync_tol: 1,
            sync_value: vec![0x2D, 0xD4],
            fifo_fill_condition: FifoFillCondition::Always,
            ..RadioConfig::default()
        };
        let regs = encode(&config).unwrap();
        assert_eq!(regs.get(0x2E), Some(0x80 | 0x40 | 0x08 | 0x01));
        assert_eq!(regs.get(0x2F), Some(0x2D));
        assert_eq!(regs.get(0x30), Some(0xD4));
        assert_eq!(regs.get(0x31), None);

        let off = RadioConfig {
            sync_on: false,
            ..RadioConfig::default()
        };
        let regs = encode(&off).unwrap();
        assert_eq!(regs.get(0x2E), Some(0x18));
        assert_eq!(regs.get(0x2F), None);
    }

    #[test]
    fn test_sync_value_rejected() {
        let zero = RadioConfig {
            sync_value: vec![0x2D, 0x00, 0x01, 0x01],
            ..RadioConfig::default()
        };
        assert!(matches!(
            encode(&zero),
            Err(RegCalcError::ConstraintViolation { field: "sync_value", .. })
        ));

        let short = RadioConfig {
            sync_value: vec![0x2D, 0xD4],
            ..RadioConfig::default()
        };
        assert!(matches!(
            encode(&short),
            Err(RegCalcError::ConstraintViolation { field: "sync_value", .. })
        ));

        let long = RadioConfig {
            sync_size: 2,
            sync_value: vec![0x2D, 0xD4, 0x99],
            ..RadioConfig::default()
        };
        assert!(matches!(
            encode(&long),
            Err(RegCalcError::ConstraintViolation { field: "sync_value", .. })
        ));
    }

    #[test]
    fn test_partial_sync_word_keeps_prior_bytes() {
        let regs: RegisterMap = [(0x2E, 0x88), (0x2F, 0xAA)].into_iter().collect();
        let decoded = decode(&regs, &RadioConfig::default()).unwrap();
        assert_eq!(decoded.sync_size, 2);
        assert_eq!(decoded.sync_value, vec![0xAA, 0x01]);

        let grown: RegisterMap = [(0x2E, 0xB8)].into_iter().collect();
        let decoded = decode(&grown, &RadioConfig::default()).unwrap();
        assert_eq!(decoded.sync_size, 8);
        assert_eq!(decoded.sync_value, vec![0x01; 4]);
    }

    #[test]
    fn test_payload_length_counts_prefix_bytes() {
        let config = RadioConfig {
            packet_format: PacketFormat::Variable,
            address_filtering: AddressFiltering::NodeOrBroadcast,
            node_address: 0x12,
            broadcast_address: 0xFF,
            payload_msg_len: 20,
            ..RadioConfig::default()
        };
        let regs = encode(&config).unwrap();
        assert_eq!(regs.get(0x37), Some(0x80 | 0x10 | 0x04));
        assert_eq!(regs.get(0x38), Some(22));
        assert_eq!(regs.get(0x39), Some(0x12));
        assert_eq!(regs.get(0x3A), Some(0xFF));

        let decoded = decode(&regs, &RadioConfig::default()).unwrap();
        assert_eq!(decoded.packet_format, PacketFormat::Variable);
        assert_eq!(decoded.payload_msg_len, 20);
        assert_eq!(decoded.address_filtering, AddressFiltering::NodeOrBroadcast);
    }

    #[test]
    fn test_unlimited_length() {
        let config = RadioConfig {
            packet_format: PacketFormat::Unlimited,
            ..RadioConfig::default()
        };
        let regs = encode(&config).unwrap();
        assert_eq!(regs.get(0x38), Some(0));
        let decoded = decode(&regs, &RadioConfig::default()).unwrap();
        assert_eq!(decoded.packet_format, PacketFormat::Unlimited);
        assert_eq!(decoded.payload_msg_len, 64);

        let fixed_again: RegisterMap = [(0x37, 0x10), (0x38, 0x20)].into_iter().collect();
        let decoded = decode(&fixed_again, &decoded).unwrap();
        assert_eq!(decoded.packet_format, PacketFormat::Fixed);
        assert_eq!(decoded.payload_msg_len, 32);
    }

    #[test]
    fn test_payload_length_underflow() {
        let regs: RegisterMap = [(0x37, 0x80), (0x38, 0x00)].into_iter().collect();
        let err = decode(&regs, &RadioConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RegCalcError::DecodeError { register: 0x38, value: 0, .. }
        ));
    }

    #[test]
    fn test_packet_config_1_reserved_codes() {
        let regs: RegisterMap = [(0x37, 0x60)].into_iter().collect();
        assert!(decode(&regs, &RadioConfig::default()).is_err());
        let regs: RegisterMap = [(0x37, 0x06)].into_iter().collect();
        assert!(decode(&regs, &RadioConfig::default()).is_err());
    }

    #[test]
    fn test_auto_modes_flag_from_conditions() {
        let regs: RegisterMap = [(0x3B, (3 << 5) | (4 << 2) | 1)].into_iter().collect();
        let decoded = decode(&regs, &RadioConfig::default()).unwrap();
        assert!(decoded.auto_modes_on);
        assert_eq!(decoded.auto_modes.intermediate_mode, 1);

        let regs: RegisterMap = [(0x3B, 3 << 5)].into_iter().collect();
        assert!(!decode(&regs, &RadioConfig::default()).unwrap().auto_modes_on);
    }

    #[test]
    fn test_aes_key_only_when_active() {
        let key = AesKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let config = RadioConfig {
            aes_on: true,
            aes_key: key.clone(),
            ..RadioConfig::default()
        };
        let regs = encode(&config).unwrap();
        assert_eq!(regs.get(0x3D), Some(0x03));
        assert_eq!(regs.get(0x3E), Some(0x00));
        assert_eq!(regs.get(0x4D), Some(0xFF));
        assert_eq!(decode(&regs, &RadioConfig::default()).unwrap().aes_key, key);

        let unlimited = RadioConfig {
            packet_format: PacketFormat::Unlimited,
            ..config
        };
        let regs = encode(&unlimited).unwrap();
        assert_eq!(regs.get(0x3D), Some(0x02));
        assert!(!regs.contains(0x3E));
    }
}
