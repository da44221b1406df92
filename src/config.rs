/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use crate::register::{
    DEFAULT_ADDRESS, REG_ACQ_CONFIG, REG_REF_COUNT_VAL, REG_SIG_COUNT_VAL,
    REG_THRESHOLD_BYPASS,
};

/// Default number of STATUS reads before a measurement is abandoned
pub const DEFAULT_BUSY_POLL_LIMIT: u16 = 100;

/// Number of (register, value) writes in every preset
pub const PRESET_LEN: usize = 4;

/// Measurement configuration presets.
/// Each trades maximum range against speed and detection sensitivity.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Default mode, balanced performance
    #[default]
    Balanced = 0,
    /// Short range, high speed. Uses 0x1d maximum acquisition count.
    ShortRangeHighSpeed = 1,
    /// Default range, higher speed short range. Turns on quick termination
    /// detection for faster measurements at short range (with decreased
    /// accuracy)
    QuickTermination = 2,
    /// Maximum range. Uses 0xff maximum acquisition count.
    MaximumRange = 3,
    /// High sensitivity detection: more detections, more erroneous
    /// measurements
    HighSensitivity = 4,
    /// Low sensitivity detection: fewer detections, fewer erroneous
    /// measurements
    LowSensitivity = 5,
    /// Short range, high speed, higher error. Not recommended.
    ShortRangeHighError = 6,
}

/// Register writes applied for each mode, indexed by `Mode as usize`.
/// Order: sig count max, acquisition config, ref count max, threshold bypass.
static PRESETS: [[(u8, u8); PRESET_LEN]; 7] = [
    preset(0x80, 0x08, 0x05, 0x00),
    preset(0x1d, 0x08, 0x03, 0x00),
    preset(0x80, 0x00, 0x03, 0x00),
    preset(0xff, 0x08, 0x05, 0x00),
    preset(0x80, 0x08, 0x05, 0x80),
    preset(0x80, 0x08, 0x05, 0xb0),
    preset(0x04, 0x01, 0x03, 0x00),
];

const fn preset(
    sig_count_max: u8,
    acq_config: u8,
    ref_count_max: u8,
    threshold_bypass: u8,
) -> [(u8, u8); PRESET_LEN] {
    [
        (REG_SIG_COUNT_VAL, sig_count_max),
        (REG_ACQ_CONFIG, acq_config),
        (REG_REF_COUNT_VAL, ref_count_max),
        (REG_THRESHOLD_BYPASS, threshold_bypass),
    ]
}

impl Mode {
    /// The ordered (register, value) writes that select this mode
    pub fn preset(self) -> &'static [(u8, u8); PRESET_LEN] {
        &PRESETS[self as usize]
    }
}

/// A mode selector outside 0..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidMode(pub u8);

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(Mode::Balanced),
            1 => Ok(Mode::ShortRangeHighSpeed),
            2 => Ok(Mode::QuickTermination),
            3 => Ok(Mode::MaximumRange),
            4 => Ok(Mode::HighSensitivity),
            5 => Ok(Mode::LowSensitivity),
            6 => Ok(Mode::ShortRangeHighError),
            other => Err(InvalidMode(other)),
        }
    }
}

/// Construction parameters for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Preset written to the device by `init`
    pub mode: Mode,
    /// 7-bit I2C device address
    pub address: u8,
    /// Maximum STATUS reads per measurement before giving up
    pub busy_poll_limit: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            address: DEFAULT_ADDRESS,
            busy_poll_limit: DEFAULT_BUSY_POLL_LIMIT,
        }
    }
}

impl Config {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Select the preset by its numeric selector (0..=6)
    pub fn for_mode(selector: u8) -> Result<Self, InvalidMode> {
        Mode::try_from(selector).map(Self::new)
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_busy_poll_limit(mut self, limit: u16) -> Self {
        self.busy_poll_limit = limit;
        self
    }
}
