//! QMC5883L Asynchronous Driver Implementation
//!
//! This module mirrors the blocking driver (sensor.rs) on top of
//! embedded-hal-async, so the data-ready poll yields to the executor
//! between attempts instead of blocking the thread of control. All
//! operations, error semantics and calibration behavior are identical to
//! the blocking version.

use crate::{
    address::Address,
    axis::Axis,
    calibration::Calibration,
    config::Config,
    error_async::{Error, InitError},
    heading,
    mag::Mag,
    registers::{Register, STATUS_DOR, STATUS_DRDY, STATUS_OVL},
};
use core::f32::consts::PI;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

/// Microseconds between data-ready polls.
const DEFAULT_POLL_INTERVAL_US: u32 = 500;
/// Poll attempts before giving up. With the default interval this is a
/// 250 ms deadline, comfortably above one 10 Hz output period.
const DEFAULT_POLL_ATTEMPTS: u32 = 500;

/// QST QMC5883L Driver
pub struct Qmc5883l<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    declination: f32,
    calibration: Calibration,
    poll_interval_us: u32,
    poll_attempts: u32,
}

impl<I> Qmc5883l<I>
where
    I: I2c,
{
    /// Construct a new i2c driver for the QMC5883L.
    ///
    /// Probes for the device, issues the SET/RESET write and programs the
    /// packed configuration byte. On failure the bus is handed back
    /// inside the [`InitError`].
    pub async fn new(i2c: I, address: Address, config: Config) -> Result<Self, InitError<I>> {
        let mut sensor = Self {
            i2c,
            address: address.into(),
            declination: config.declination_radians(),
            calibration: Calibration::new(),
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        };

        if let Err(error) = sensor.initialize(&config).await {
            Err(InitError {
                error,
                i2c: sensor.i2c,
            })
        } else {
            Ok(sensor)
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    async fn initialize(&mut self, config: &Config) -> Result<(), Error<I>> {
        // A minimal read doubles as the presence probe: any bus error
        // means nothing acknowledged at the device address.
        if self.read_register(Register::ChipId).await.is_err() {
            return Err(Error::DeviceNotFound);
        }
        self.write_register(Register::SetResetPeriod, 0x01).await?;
        self.write_register(Register::Control1, config.to_byte())
            .await?;
        Ok(())
    }

    pub(crate) async fn read(&mut self, bytes: &[u8], response: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, bytes, response)
            .await
            .map_err(|e| Error::WriteReadError(e))
    }

    pub(crate) async fn write(&mut self, bytes: &[u8]) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(|e| Error::WriteError(e))
    }

    pub(crate) async fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read(&[reg as u8], &mut buf).await?;
        Ok(buf[0])
    }

    pub(crate) async fn read_registers<'a>(
        &mut self,
        reg: Register,
        buf: &'a mut [u8],
    ) -> Result<&'a [u8], Error<I>> {
        self.read(&[reg as u8], buf).await?;
        Ok(buf)
    }

    pub(crate) async fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        self.write(&[reg as u8, value]).await
    }

    /// Chip identification register, 0xFF on a genuine QMC5883L.
    pub async fn chip_id(&mut self) -> Result<u8, Error<I>> {
        self.read_register(Register::ChipId).await
    }

    /// A fresh sample is waiting in the output registers.
    pub async fn is_data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status).await? & STATUS_DRDY != 0)
    }

    /// At least one axis saturated the configured field range.
    pub async fn is_overflow(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status).await? & STATUS_OVL != 0)
    }

    /// A sample was produced faster than it was read out.
    pub async fn is_data_skipped(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status).await? & STATUS_DOR != 0)
    }

    /// Raw die temperature. The sensor is factory-calibrated for slope
    /// only (100 LSB/°C), not for absolute offset.
    pub async fn temperature_raw(&mut self) -> Result<i16, Error<I>> {
        let mut data = [0; 2];
        self.read_registers(Register::TempLsb, &mut data).await?;
        Ok(i16::from_le_bytes(data))
    }

    /// Replace the declination used for subsequent headings, in degrees.
    pub fn set_declination_degrees(&mut self, degrees: f32) {
        self.declination = degrees / 180.0 * PI;
    }

    /// Reconfigure the data-ready poll deadline (`interval_us × attempts`).
    pub fn set_ready_timeout(&mut self, interval_us: u32, attempts: u32) {
        self.poll_interval_us = interval_us;
        self.poll_attempts = attempts;
    }

    /// Calibration windows learned so far on this instance.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Discard the learned calibration windows.
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
    }

    /// Wait for a fresh sample and read the raw field vector.
    pub async fn raw_values(&mut self, delay: &mut impl DelayNs) -> Result<Mag, Error<I>> {
        self.wait_data_ready(delay).await?;
        let mut data = [0; 6];
        self.read_registers(Register::XOutLsb, &mut data).await?;
        Ok(Mag::from_bytes(data))
    }

    async fn wait_data_ready(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I>> {
        for _ in 0..self.poll_attempts {
            if self.is_data_ready().await? {
                return Ok(());
            }
            delay.delay_us(self.poll_interval_us).await;
        }
        Err(Error::Timeout)
    }

    /// Compass heading in radians, [0, 2π).
    ///
    /// `axis1` points toward the heading reference ("north"), `axis2` 90°
    /// to its left ("west"). Every call also feeds the calibration
    /// windows, so headings converge as the sensor is rotated.
    pub async fn heading(
        &mut self,
        delay: &mut impl DelayNs,
        axis1: Axis,
        axis2: Axis,
    ) -> Result<f32, Error<I>> {
        if axis1 == axis2 {
            return Err(Error::InvalidAxisPair);
        }
        let mag = self.raw_values(delay).await?;
        self.calc_heading(axis1, axis2, &mag)
    }

    /// Compass heading in degrees, [0, 360).
    pub async fn heading_degrees(
        &mut self,
        delay: &mut impl DelayNs,
        axis1: Axis,
        axis2: Axis,
    ) -> Result<f32, Error<I>> {
        Ok(self.heading(delay, axis1, axis2).await? * 180.0 / PI)
    }

    /// Heading of an already-acquired vector, in radians. No bus I/O;
    /// the calibration windows are still updated.
    pub fn calc_heading(&mut self, axis1: Axis, axis2: Axis, mag: &Mag) -> Result<f32, Error<I>> {
        if axis1 == axis2 {
            return Err(Error::InvalidAxisPair);
        }
        Ok(heading::compute(
            &mut self.calibration,
            axis1,
            axis2,
            mag,
            self.declination,
        ))
    }

    /// Heading of an already-acquired vector, in degrees.
    pub fn calc_heading_degrees(
        &mut self,
        axis1: Axis,
        axis2: Axis,
        mag: &Mag,
    ) -> Result<f32, Error<I>> {
        Ok(self.calc_heading(axis1, axis2, mag)? * 180.0 / PI)
    }
}
