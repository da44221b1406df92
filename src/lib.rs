/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Driver for the Garmin LIDAR-Lite v3HP optical distance sensor.
//!
//! The sensor is configured with one of seven [`Mode`] presets by
//! [`LidarLite::init`]. Distances are returned in centimeters.
//!
//! ```no_run
//! use embedded_hal_mock::eh0::delay::NoopDelay;
//! use embedded_hal_mock::eh0::i2c::Mock;
//! use lidar_lite_v3hp::{Config, LidarLite};
//!
//! let i2c = Mock::new(&[]);
//! let config = Config::for_mode(0).unwrap();
//! let mut lidar = LidarLite::new(i2c, NoopDelay::new(), config);
//! lidar.init().unwrap();
//! let precise_cm = lidar.range_single().unwrap();
//! // skips receiver bias correction; interleave with range_single
//! let fast_cm = lidar.distance_fast().unwrap();
//! ```

#![no_std]

mod fmt;

pub mod config;
pub mod register;

pub use config::{Config, InvalidMode, Mode};

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::register::*;

/// Bus settling time before the first preset write
const SETTLE_DELAY_US: u32 = 80;
/// Pause after every register write, before the next transaction
const WRITE_DELAY_US: u32 = 10;

/// Errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE> {
    /// Sensor communication error
    Comm(CommE),

    /// Mode selector outside 0..=6
    InvalidMode(u8),

    /// Busy flag did not clear within the poll limit
    Timeout,

    /// I2C address outside 0x08..=0x77
    InvalidAddress(u8),
}

impl<CommE: core::fmt::Debug> core::fmt::Display for Error<CommE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Comm(e) => write!(f, "i2c error: {:?}", e),
            Error::InvalidMode(mode) => write!(f, "invalid mode {}", mode),
            Error::Timeout => f.write_str("timed out waiting for measurement"),
            Error::InvalidAddress(addr) => {
                write!(f, "invalid i2c address {:#04x}", addr)
            }
        }
    }
}

impl<CommE> From<InvalidMode> for Error<CommE> {
    fn from(err: InvalidMode) -> Self {
        Error::InvalidMode(err.0)
    }
}

/// Measurement trigger variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acquisition {
    /// Measure with receiver bias correction
    BiasCorrected,
    /// Skip receiver bias correction: faster, but accuracy drifts
    /// unless bias-corrected measurements are taken periodically
    Fast,
}

impl Acquisition {
    fn command(self) -> u8 {
        match self {
            Acquisition::BiasCorrected => CMD_MEASURE_BIAS_CORRECTED,
            Acquisition::Fast => CMD_MEASURE_FAST,
        }
    }
}

#[derive(Debug)]
pub struct LidarLite<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    mode: Mode,
    busy_poll_limit: u16,
}

impl<I2C, D, CommE> LidarLite<I2C, D>
where
    I2C: Write<Error = CommE> + WriteRead<Error = CommE>,
    D: DelayUs<u32>,
    CommE: core::fmt::Debug,
{
    /// No bus traffic happens until [`LidarLite::init`]
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self {
            i2c,
            delay,
            address: config.address,
            mode: config.mode,
            busy_poll_limit: config.busy_poll_limit,
        }
    }

    /// Let the bus settle, then write the mode preset to the device.
    /// No read-back is done: if a preset write fails the device may be
    /// left partially configured, and `init` may be retried.
    pub fn init(&mut self) -> Result<(), crate::Error<CommE>> {
        self.delay.delay_us(SETTLE_DELAY_US);
        for &(reg, val) in self.mode.preset() {
            trace!("preset reg {} <- {}", reg, val);
            self.write_register(reg, val)?;
        }
        Ok(())
    }

    /// Take a bias-corrected measurement and wait for the result.
    /// Returns distance in centimeters.
    pub fn range_single(&mut self) -> Result<u16, crate::Error<CommE>> {
        self.measure(Acquisition::BiasCorrected)
    }

    /// Take a measurement without receiver bias correction and wait for
    /// the result. Returns distance in centimeters.
    pub fn distance_fast(&mut self) -> Result<u16, crate::Error<CommE>> {
        self.measure(Acquisition::Fast)
    }

    fn measure(
        &mut self,
        acquisition: Acquisition,
    ) -> Result<u16, crate::Error<CommE>> {
        self.trigger(acquisition)?;
        self.wait_while_busy()?;
        let distance = self.read_distance()?;
        debug!("distance {} cm", distance);
        Ok(distance)
    }

    /// Start a measurement without waiting for it to complete
    pub fn trigger(
        &mut self,
        acquisition: Acquisition,
    ) -> Result<(), crate::Error<CommE>> {
        self.write_register(REG_ACQ_COMMAND, acquisition.command())
    }

    /// Is a measurement in progress?
    pub fn is_busy(&mut self) -> Result<bool, crate::Error<CommE>> {
        let status = self.read_register(REG_STATUS)?;
        Ok(status & STATUS_BUSY != 0)
    }

    /// Poll the busy flag until it clears, reading STATUS at most
    /// `busy_poll_limit` times.
    pub fn wait_while_busy(&mut self) -> Result<(), crate::Error<CommE>> {
        for _ in 0..self.busy_poll_limit {
            if !self.is_busy()? {
                return Ok(());
            }
        }
        Err(Error::Timeout)
    }

    /// Read the most recent distance measurement, in centimeters
    pub fn read_distance(&mut self) -> Result<u16, crate::Error<CommE>> {
        let mut buf = [0u8; 2];
        self.read_block(REG_FULL_DELAY_HIGH, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Quickly settle the reference filter, which otherwise takes a few
    /// hundred measurements to converge after power-up.
    pub fn reset_reference_filter(
        &mut self,
    ) -> Result<(), crate::Error<CommE>> {
        let acq_config = self.read_register(REG_ACQ_CONFIG)?;
        self.write_register(
            REG_ACQ_CONFIG,
            acq_config | ACQ_CONFIG_REF_FILTER_DISABLE,
        )?;
        let ref_count_max = self.read_register(REG_REF_COUNT_VAL)?;
        // overflow the reference count as fast as possible
        self.write_register(REG_REF_COUNT_VAL, 0xFF)?;

        self.trigger(Acquisition::BiasCorrected)?;
        self.wait_while_busy()?;

        self.write_register(REG_REF_COUNT_VAL, ref_count_max)?;
        self.write_register(REG_ACQ_CONFIG, acq_config)
    }

    /// Move the sensor to a secondary I2C address.
    /// If `disable_default` is set the sensor stops responding at the
    /// default address 0x62.
    pub fn set_address(
        &mut self,
        new_address: u8,
        disable_default: bool,
    ) -> Result<(), crate::Error<CommE>> {
        if !(0x08..=0x77).contains(&new_address) {
            return Err(Error::InvalidAddress(new_address));
        }

        // the serial number must be echoed back to unlock the address change
        let mut unit_id = [0u8; 2];
        self.read_block(REG_UNIT_ID_HIGH, &mut unit_id)?;
        self.write_block(REG_I2C_ID_HIGH, &unit_id)?;

        // device expects the address left-aligned
        self.write_register(REG_I2C_SEC_ADDR, new_address << 1)?;
        let i2c_config = self.read_register(REG_I2C_CONFIG)?;
        self.write_register(
            REG_I2C_CONFIG,
            i2c_config | I2C_CONFIG_USE_SECONDARY,
        )?;
        debug!("address {} -> {}", self.address, new_address);
        self.address = new_address;

        if disable_default {
            let i2c_config = self.read_register(REG_I2C_CONFIG)?;
            self.write_register(
                REG_I2C_CONFIG,
                i2c_config | I2C_CONFIG_DISABLE_DEFAULT,
            )?;
        }
        Ok(())
    }

    /// Current 7-bit I2C device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Preset written by `init`
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Give back the bus handle and delay source
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Write a value to a single register
    pub fn write_register(
        &mut self,
        reg: u8,
        val: u8,
    ) -> Result<(), crate::Error<CommE>> {
        let write_buf = [reg, val];
        self.i2c
            .write(self.address, &write_buf)
            .map_err(Error::Comm)?;
        self.delay.delay_us(WRITE_DELAY_US);
        Ok(())
    }

    fn write_block(
        &mut self,
        reg: u8,
        vals: &[u8; 2],
    ) -> Result<(), crate::Error<CommE>> {
        let write_buf = [reg, vals[0], vals[1]];
        self.i2c
            .write(self.address, &write_buf)
            .map_err(Error::Comm)?;
        self.delay.delay_us(WRITE_DELAY_US);
        Ok(())
    }

    /// Read a single register
    pub fn read_register(
        &mut self,
        reg: u8,
    ) -> Result<u8, crate::Error<CommE>> {
        let mut buf = [0u8; 1];
        self.read_block(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Read consecutive registers starting at `reg`.
    /// Multi-byte reads set the auto-increment bit on the register address.
    pub fn read_block(
        &mut self,
        reg: u8,
        recv_buf: &mut [u8],
    ) -> Result<(), crate::Error<CommE>> {
        let cmd_buf = if recv_buf.len() > 1 {
            [reg | AUTO_INCREMENT]
        } else {
            [reg]
        };
        self.i2c
            .write_read(self.address, &cmd_buf, recv_buf)
            .map_err(Error::Comm)?;
        Ok(())
    }
}
