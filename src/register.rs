/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

/// Device command register
pub const REG_ACQ_COMMAND: u8 = 0x00;
/// System status register
pub const REG_STATUS: u8 = 0x01;
/// Maximum acquisition count
pub const REG_SIG_COUNT_VAL: u8 = 0x02;
/// Acquisition mode control
pub const REG_ACQ_CONFIG: u8 = 0x04;
/// Distance measurement high byte, followed by the low byte at 0x10
pub const REG_FULL_DELAY_HIGH: u8 = 0x0F;
/// Reference acquisition count
pub const REG_REF_COUNT_VAL: u8 = 0x12;
/// Serial number high byte, followed by the low byte at 0x17
pub const REG_UNIT_ID_HIGH: u8 = 0x16;
/// Write serial number high byte here to unlock I2C address changes
pub const REG_I2C_ID_HIGH: u8 = 0x18;
/// Secondary I2C device address
pub const REG_I2C_SEC_ADDR: u8 = 0x1A;
/// Peak detection threshold bypass
pub const REG_THRESHOLD_BYPASS: u8 = 0x1C;
/// Default address response control
pub const REG_I2C_CONFIG: u8 = 0x1E;

/// Set on a register address to auto-increment across a multi-byte read
pub const AUTO_INCREMENT: u8 = 0x80;

/// ACQ_COMMAND value: take a measurement with receiver bias correction
pub const CMD_MEASURE_BIAS_CORRECTED: u8 = 0x04;
/// ACQ_COMMAND value: take a measurement without receiver bias correction
pub const CMD_MEASURE_FAST: u8 = 0x03;

/// STATUS: device is busy taking a measurement
pub const STATUS_BUSY: u8 = 1 << 0;

/// ACQ_CONFIG: disable the reference filter
pub const ACQ_CONFIG_REF_FILTER_DISABLE: u8 = 1 << 4;

/// I2C_CONFIG: respond to the secondary address
pub const I2C_CONFIG_USE_SECONDARY: u8 = 1 << 4;
/// I2C_CONFIG: stop responding to the default address
pub const I2C_CONFIG_DISABLE_DEFAULT: u8 = 1 << 3;

/// Factory default 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x62;
