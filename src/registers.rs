//! # SX1231 Register Definitions and Constants
//!
//! Register addresses, bit field layouts and the power-on-reset table for the
//! Semtech SX1231 transceiver (also sold as the HopeRF RFM69 module). Addresses
//! and POR values follow the SX1231 datasheet.
//!
//! ## Register Map
//!
//! - 0x00-0x0F: FIFO, operating mode, data modulation, bit rate, deviation, carrier
//! - 0x10-0x2B: transmitter and receiver (PA, LNA, filters, OOK, AFC, RSSI, DIO)
//! - 0x2C-0x4D: packet engine (preamble, sync word, packet config, AES key)
//! - 0x4E-0x71: temperature sensor and test registers

use bitflags::bitflags;

// =============================================================================
// Register Addresses
// =============================================================================

/// FIFO read/write access
pub const REG_FIFO: u8 = 0x00;

/// Operating mode
pub const REG_OPMODE: u8 = 0x01;

/// Data processing mode and modulation scheme
pub const REG_DATAMODUL: u8 = 0x02;

/// Bit rate setting (MSB)
pub const REG_BITRATEMSB: u8 = 0x03;

/// Bit rate setting (LSB)
pub const REG_BITRATELSB: u8 = 0x04;

/// Frequency deviation setting (MSB)
pub const REG_FDEVMSB: u8 = 0x05;

/// Frequency deviation setting (LSB)
pub const REG_FDEVLSB: u8 = 0x06;

/// RF carrier frequency (MSB)
pub const REG_FRFMSB: u8 = 0x07;

/// RF carrier frequency (MID)
pub const REG_FRFMID: u8 = 0x08;

/// RF carrier frequency (LSB), latches the whole 24-bit value
pub const REG_FRFLSB: u8 = 0x09;

/// RC oscillator settings
pub const REG_OSC1: u8 = 0x0A;

/// AFC control in low modulation index situations
pub const REG_AFCCTRL: u8 = 0x0B;

/// PA selection and output power control
pub const REG_PALEVEL: u8 = 0x11;

/// Control of PA ramp time in FSK mode
pub const REG_PARAMP: u8 = 0x12;

/// Over current protection control
pub const REG_OCP: u8 = 0x13;

/// LNA settings
pub const REG_LNA: u8 = 0x18;

/// Channel filter bandwidth control
pub const REG_RXBW: u8 = 0x19;

/// AFC bandwidth control
pub const REG_AFCBW: u8 = 0x1A;

/// OOK demodulator selection and control in peak mode
pub const REG_OOKPEAK: u8 = 0x1B;

/// Average threshold control of OOK demodulator
pub const REG_OOKAVG: u8 = 0x1C;

/// Fixed threshold control of OOK demodulator
pub const REG_OOKFIX: u8 = 0x1D;

/// AFC and FEI control and status
pub const REG_AFCFEI: u8 = 0x1E;

/// Mapping of pins DIO0 to DIO3
pub const REG_DIOMAPPING1: u8 = 0x25;

/// Mapping of pins DIO4 and DIO5, ClkOut frequency
pub const REG_DIOMAPPING2: u8 = 0x26;

/// RSSI trigger level for RSSI interrupt
pub const REG_RSSITHRESH: u8 = 0x29;

/// Preamble length (MSB)
pub const REG_PREAMBLEMSB: u8 = 0x2C;

/// Preamble length (LSB)
pub const REG_PREAMBLELSB: u8 = 0x2D;

/// Sync word recognition control
pub const REG_SYNCCONFIG: u8 = 0x2E;

/// Sync word byte 1, followed by bytes 2-8 at consecutive addresses
pub const REG_SYNCVALUE1: u8 = 0x2F;

/// Packet mode settings
pub const REG_PACKETCONFIG1: u8 = 0x37;

/// Payload length setting
pub const REG_PAYLOADLENGTH: u8 = 0x38;

/// Node address
pub const REG_NODEADRS: u8 = 0x39;

/// Broadcast address
pub const REG_BROADCASTADRS: u8 = 0x3A;

/// Auto modes settings
pub const REG_AUTOMODES: u8 = 0x3B;

/// FIFO threshold, TX start condition
pub const REG_FIFOTHRESH: u8 = 0x3C;

/// Packet mode settings
pub const REG_PACKETCONFIG2: u8 = 0x3D;

/// AES key byte 1, followed by bytes 2-16 at consecutive addresses
pub const REG_AESKEY1: u8 = 0x3E;

/// Sensitivity boost
pub const REG_TESTLNA: u8 = 0x58;

/// TCXO or crystal input selection
pub const REG_TESTTCXO: u8 = 0x59;

/// PLL bandwidth setting
pub const REG_TESTPLLBW: u8 = 0x5F;

/// Fading margin improvement (DAGC)
pub const REG_TESTDAGC: u8 = 0x6F;

/// AFC offset for low modulation index AFC
pub const REG_TESTAFC: u8 = 0x71;

/// Number of sync word registers
pub const SYNC_VALUE_LEN: usize = 8;

/// Number of AES key registers
pub const AES_KEY_LEN: usize = 16;

// =============================================================================
// Bit Fields
// =============================================================================

/// RegDataModul: DataMode field
pub const RF_DATAMODUL_DATAMODE_SHIFT: u8 = 5;
pub const RF_DATAMODUL_DATAMODE_PACKET: u8 = 0x00;
pub const RF_DATAMODUL_DATAMODE_CONTINUOUS: u8 = 0x02;
pub const RF_DATAMODUL_DATAMODE_CONTINUOUS_NOBSYNC: u8 = 0x03;

/// RegDataModul: ModulationType field
pub const RF_DATAMODUL_MODULATIONTYPE_SHIFT: u8 = 3;
pub const RF_DATAMODUL_MODULATIONTYPE_FSK: u8 = 0x00;
pub const RF_DATAMODUL_MODULATIONTYPE_OOK: u8 = 0x01;

/// RegDataModul: ModulationShaping field
pub const RF_DATAMODUL_SHAPING_MASK: u8 = 0x03;

/// RegFdevMsb holds the upper 6 bits of the 14-bit deviation
pub const RF_FDEVMSB_MASK: u8 = 0x3F;

/// RegAfcCtrl: improved AFC routine for low modulation index
pub const RF_AFCCTRL_LOWBETA_ON: u8 = 0x20;

/// RegPaLevel: OutputPower field
pub const RF_PALEVEL_OUTPUTPOWER_MASK: u8 = 0x1F;

/// RegPaLevel: power level offset, Pout = -18 dBm + OutputPower
pub const RF_PALEVEL_POWER_OFFSET: i8 = 18;

/// Above this level PA2 is switched on and the programmed level drops by 4 dB
pub const RF_PALEVEL_BOOST_THRESHOLD_DBM: i8 = 13;
pub const RF_PALEVEL_BOOST_DB: i8 = 4;

/// RegPaRamp: PaRamp field
pub const RF_PARAMP_MASK: u8 = 0x0F;

/// RegOcp: enable flag and trimming field, Imax = 45 mA + 5 mA * trim
pub const RF_OCP_ON: u8 = 0x10;
pub const RF_OCP_TRIM_MASK: u8 = 0x0F;
pub const RF_OCP_OFF_DEFAULT: u8 = 0x0A;
pub const RF_OCP_IMAX_BASE_MA: u8 = 45;
pub const RF_OCP_IMAX_STEP_MA: u8 = 5;

/// RegLna: LnaZin (200 ohm), reserved bits and LnaGainSelect field
pub const RF_LNA_ZIN_200: u8 = 0x80;
pub const RF_LNA_RESERVED: u8 = 0x08;
pub const RF_LNA_GAINSELECT_MASK: u8 = 0x07;

/// RegRxBw / RegAfcBw: DccFreq, RxBwMant and RxBwExp fields
pub const RF_RXBW_DCCFREQ_SHIFT: u8 = 5;
pub const RF_RXBW_MANT_SHIFT: u8 = 3;
pub const RF_RXBW_MANT_MASK: u8 = 0x03;
pub const RF_RXBW_EXP_MASK: u8 = 0x07;

/// RegOokPeak: OokThreshType, OokPeakThreshStep and OokPeakThreshDec fields
pub const RF_OOKPEAK_THRESHTYPE_SHIFT: u8 = 6;
pub const RF_OOKPEAK_PEAKTHRESHSTEP_SHIFT: u8 = 3;
pub const RF_OOKPEAK_FIELD_MASK: u8 = 0x07;

/// RegOokAvg: OokAverageThreshFilt field
pub const RF_OOKAVG_THRESHFILT_SHIFT: u8 = 6;

/// RegAfcFei always written with AfcDone set
pub const RF_AFCFEI_BASE: u8 = 0x10;

/// RegDioMapping2: ClkOut field
pub const RF_DIOMAPPING2_CLKOUT_MASK: u8 = 0x07;

/// RegSyncConfig: SyncSize and SyncTol fields
pub const RF_SYNC_SIZE_SHIFT: u8 = 3;
pub const RF_SYNC_FIELD_MASK: u8 = 0x07;
/// RegSyncConfig value written when sync word generation is off
pub const RF_SYNC_OFF: u8 = 0x18;

/// RegPacketConfig1: DcFree and AddressFiltering fields
pub const RF_PACKET1_DCFREE_SHIFT: u8 = 5;
pub const RF_PACKET1_ADRSFILTERING_SHIFT: u8 = 1;
pub const RF_PACKET1_FIELD_MASK: u8 = 0x03;

/// RegAutoModes: EnterCondition, ExitCondition and IntermediateMode fields
pub const RF_AUTOMODES_ENTER_SHIFT: u8 = 5;
pub const RF_AUTOMODES_EXIT_SHIFT: u8 = 2;
pub const RF_AUTOMODES_CONDITION_MASK: u8 = 0x07;
pub const RF_AUTOMODES_INTERMEDIATE_MASK: u8 = 0x03;

/// RegFifoThresh: TxStartCondition flag and FifoThreshold field
pub const RF_FIFOTHRESH_TXSTART_FIFONOTEMPTY: u8 = 0x80;
pub const RF_FIFOTHRESH_VALUE_MASK: u8 = 0x7F;

/// RegPacketConfig2: InterPacketRxDelay field
pub const RF_PACKET2_RXRESTARTDELAY_SHIFT: u8 = 4;

/// RegTestLna values
pub const RF_TESTLNA_NORMAL: u8 = 0x1B;
pub const RF_TESTLNA_HIGH_SENSITIVITY: u8 = 0x2D;

/// RegTestTcxo: base value and TcxoInputOn flag
pub const RF_TESTTCXO_BASE: u8 = 0x09;
pub const RF_TESTTCXO_INPUT_ON: u8 = 0x10;

/// RegTestDagc values
pub const RF_DAGC_OFF: u8 = 0x00;
pub const RF_DAGC_IMPROVED_LOWBETA1: u8 = 0x20;
pub const RF_DAGC_IMPROVED_LOWBETA0: u8 = 0x30;

bitflags! {
    /// Single-bit flags of RegPaLevel
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PaLevelFlags: u8 {
        const PA0_ON = 0x80;
        const PA1_ON = 0x40;
        const PA2_ON = 0x20;
    }
}

bitflags! {
    /// Single-bit flags of RegAfcFei
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AfcFeiFlags: u8 {
        const AFC_AUTOCLEAR_ON = 0x08;
        const AFC_AUTO_ON = 0x04;
    }
}

bitflags! {
    /// Single-bit flags of RegSyncConfig
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SyncConfigFlags: u8 {
        const SYNC_ON = 0x80;
        const FIFO_FILL_CONDITION = 0x40;
    }
}

bitflags! {
    /// Single-bit flags of RegPacketConfig1
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PacketConfig1Flags: u8 {
        const VARIABLE_LENGTH = 0x80;
        const CRC_ON = 0x10;
        const CRC_AUTO_CLEAR_OFF = 0x08;
    }
}

bitflags! {
    /// Single-bit flags of RegPacketConfig2
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PacketConfig2Flags: u8 {
        const AUTO_RX_RESTART_ON = 0x02;
        const AES_ON = 0x01;
    }
}

// =============================================================================
// Power-On-Reset Values
// =============================================================================

/// Register contents right after power-on reset, in ascending address order.
pub const POR_REGISTERS: [(u8, u8); 85] = [
    (0x00, 0x00),
    (0x01, 0x04),
    (0x02, 0x00),
    (0x03, 0x1A),
    (0x04, 0x0B),
    (0x05, 0x00),
    (0x06, 0x52),
    (0x07, 0xE4),
    (0x08, 0xC0),
    (0x09, 0x00),
    (0x0A, 0x41),
    (0x0B, 0x00),
    (0x0C, 0x02),
    (0x0D, 0x92),
    (0x0E, 0xF5),
    (0x0F, 0x20),
    (0x10, 0x23),
    (0x11, 0x9F),
    (0x12, 0x09),
    (0x13, 0x1A),
    (0x14, 0x40),
    (0x15, 0xB0),
    (0x16, 0x7B),
    (0x17, 0x9B),
    (0x18, 0x08),
    (0x19, 0x86),
    (0x1A, 0x8A),
    (0x1B, 0x40),
    (0x1C, 0x80),
    (0x1D, 0x06),
    (0x1E, 0x10),
    (0x1F, 0x00),
    (0x20, 0x00),
    (0x21, 0x00),
    (0x22, 0x00),
    (0x23, 0x02),
    (0x24, 0xFF),
    (0x25, 0x00),
    (0x26, 0x05),
    (0x27, 0x80),
    (0x28, 0x00),
    (0x29, 0xFF),
    (0x2A, 0x00),
    (0x2B, 0x00),
    (0x2C, 0x00),
    (0x2D, 0x03),
    (0x2E, 0x98),
    (0x2F, 0x00),
    (0x30, 0x00),
    (0x31, 0x00),
    (0x32, 0x00),
    (0x33, 0x00),
    (0x34, 0x00),
    (0x35, 0x00),
    (0x36, 0x00),
    (0x37, 0x10),
    (0x38, 0x40),
    (0x39, 0x00),
    (0x3A, 0x00),
    (0x3B, 0x00),
    (0x3C, 0x0F),
    (0x3D, 0x02),
    (0x3E, 0x00),
    (0x3F, 0x00),
    (0x40, 0x00),
    (0x41, 0x00),
    (0x42, 0x00),
    (0x43, 0x00),
    (0x44, 0x00),
    (0x45, 0x00),
    (0x46, 0x00),
    (0x47, 0x00),
    (0x48, 0x00),
    (0x49, 0x00),
    (0x4A, 0x00),
    (0x4B, 0x00),
    (0x4C, 0x00),
    (0x4D, 0x00),
    (0x4E, 0x01),
    (0x4F, 0x00),
    (0x58, 0x1B),
    (0x59, 0x09),
    (0x5F, 0x08),
    (0x6F, 0x00),
    (0x71, 0x00),
];

/// Default crystal frequency of the SX1231 reference design
pub const DEFAULT_FXOSC_HZ: u32 = 32_000_000;

/// Frequency step of the low-beta AFC offset register
pub const AFC_OFFSET_STEP_HZ: f64 = 488.0;
