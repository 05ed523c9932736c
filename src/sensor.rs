//! QMC5883L Blocking Driver Implementation
//!
//! This module provides a blocking interface to the QST QMC5883L 3-axis
//! magnetometer over any `embedded-hal` I2C bus:
//!
//! Core Features:
//! - One-shot device configuration (range, output rate, over-sampling, mode)
//! - Raw field acquisition with a bounded data-ready poll
//! - Online min/max calibration and compass heading computation with
//!   declination correction
//! - Status, chip-id and die-temperature access
//!
//! The data-ready poll yields through the injected [`DelayNs`] between
//! attempts and gives up with [`Error::Timeout`] after a configurable
//! deadline instead of spinning on the bus forever.

use crate::{
    address::Address,
    axis::Axis,
    calibration::Calibration,
    config::Config,
    error::{Error, InitError},
    heading,
    mag::Mag,
    registers::{Register, STATUS_DOR, STATUS_DRDY, STATUS_OVL},
};
use core::f32::consts::PI;
use embedded_hal::{delay::DelayNs, i2c::I2c};

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
    pub fn new(i2c: I, address: Address, config: Config) -> Result<Self, InitError<I>> {
        let mut sensor = Self {
            i2c,
            address: address.into(),
            declination: config.declination_radians(),
            calibration: Calibration::new(),
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        };

        if let Err(error) = sensor.initialize(&config) {
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

    fn initialize(&mut self, config: &Config) -> Result<(), Error<I>> {
        // A minimal read doubles as the presence probe: any bus error
        // means nothing acknowledged at the device address.
        if self.read_register(Register::ChipId).is_err() {
            return Err(Error::DeviceNotFound);
        }
        self.write_register(Register::SetResetPeriod, 0x01)?;
        self.write_register(Register::Control1, config.to_byte())?;
        Ok(())
    }

    pub(crate) fn read(&mut self, bytes: &[u8], response: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, bytes, response)
            .map_err(|e| Error::WriteReadError(e))
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|e| Error::WriteError(e))
    }

    pub(crate) fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read(&[reg as u8], &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_registers<'a>(
        &mut self,
        reg: Register,
        buf: &'a mut [u8],
    ) -> Result<&'a [u8], Error<I>> {
        self.read(&[reg as u8], buf)?;
        Ok(buf)
    }

    pub(crate) fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        self.write(&[reg as u8, value])
    }

    /// Chip identification register, 0xFF on a genuine QMC5883L.
    pub fn chip_id(&mut self) -> Result<u8, Error<I>> {
        self.read_register(Register::ChipId)
    }

    /// A fresh sample is waiting in the output registers.
    pub fn is_data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_DRDY != 0)
    }

    /// At least one axis saturated the configured field range.
    pub fn is_overflow(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_OVL != 0)
    }

    /// A sample was produced faster than it was read out.
    pub fn is_data_skipped(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_DOR != 0)
    }

    /// Raw die temperature. The sensor is factory-calibrated for slope
    /// only (100 LSB/°C), not for absolute offset.
    pub fn temperature_raw(&mut self) -> Result<i16, Error<I>> {
        let mut data = [0; 2];
        self.read_registers(Register::TempLsb, &mut data)?;
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
    pub fn raw_values(&mut self, delay: &mut impl DelayNs) -> Result<Mag, Error<I>> {
        self.wait_data_ready(delay)?;
        let mut data = [0; 6];
        self.read_registers(Register::XOutLsb, &mut data)?;
        Ok(Mag::from_bytes(data))
    }

    fn wait_data_ready(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I>> {
        for _ in 0..self.poll_attempts {
            if self.is_data_ready()? {
                return Ok(());
            }
            delay.delay_us(self.poll_interval_us);
        }
        Err(Error::Timeout)
    }

    /// Compass heading in radians, [0, 2π).
    ///
    /// `axis1` points toward the heading reference ("north"), `axis2` 90°
    /// to its left ("west"). Every call also feeds the calibration
    /// windows, so headings converge as the sensor is rotated.
    pub fn heading(
        &mut self,
        delay: &mut impl DelayNs,
        axis1: Axis,
        axis2: Axis,
    ) -> Result<f32, Error<I>> {
        if axis1 == axis2 {
            return Err(Error::InvalidAxisPair);
        }
        let mag = self.raw_values(delay)?;
        self.calc_heading(axis1, axis2, &mag)
    }

    /// Compass heading in degrees, [0, 360).
    pub fn heading_degrees(
        &mut self,
        delay: &mut impl DelayNs,
        axis1: Axis,
        axis2: Axis,
    ) -> Result<f32, Error<I>> {
        Ok(self.heading(delay, axis1, axis2)? * 180.0 / PI)
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

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation, SevenBitAddress};
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    /// Mock bus: records writes, replays pre-programmed read data and
    /// zero-fills once the queue runs dry.
    struct MockBus {
        writes: Vec<Vec<u8>>,
        reads: VecDeque<Vec<u8>>,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                reads: VecDeque::new(),
                fail: false,
            }
        }

        fn queue_read(&mut self, data: &[u8]) {
            self.reads.push_back(data.to_vec());
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            assert_eq!(address, 0x0D);
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => self.writes.push(bytes.to_vec()),
                    Operation::Read(buf) => {
                        buf.fill(0);
                        let data = self.reads.pop_front().unwrap_or_default();
                        let n = buf.len().min(data.len());
                        buf[..n].copy_from_slice(&data[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn ready_sensor() -> Qmc5883l<MockBus> {
        let mut bus = MockBus::new();
        bus.queue_read(&[0xFF]);
        Qmc5883l::new(bus, Address::default(), Config::default()).unwrap()
    }

    #[test]
    fn init_probes_then_resets_then_configures() {
        let sensor = ready_sensor();
        let bus = sensor.release();
        assert_eq!(
            bus.writes,
            [vec![0x0D], vec![0x0B, 0x01], vec![0x09, 0b1101_0001]]
        );
    }

    #[test]
    fn init_reports_missing_device_and_returns_the_bus() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let err = match Qmc5883l::new(bus, Address::default(), Config::default()) {
            Ok(_) => panic!("construction should fail without a device"),
            Err(err) => err,
        };
        assert!(matches!(err.error, Error::DeviceNotFound));
        // the bus came back and no write ever went out
        assert!(err.i2c.writes.is_empty());
    }

    #[test]
    fn raw_values_waits_for_drdy_then_block_reads() {
        let mut sensor = ready_sensor();
        sensor.i2c.queue_read(&[0x00]); // first status poll: not ready
        sensor.i2c.queue_read(&[STATUS_DRDY]);
        sensor
            .i2c
            .queue_read(&[0xFF, 0xFF, 0x00, 0x80, 0xFF, 0x7F]);

        let mag = sensor.raw_values(&mut NoopDelay).unwrap();
        assert_eq!(mag, Mag::new(-1, -32768, 32767));

        // the block read targets X_LSB
        let bus = sensor.release();
        assert_eq!(bus.writes.last().unwrap(), &vec![0x00]);
    }

    #[test]
    fn raw_values_times_out_when_drdy_never_sets() {
        let mut sensor = ready_sensor();
        sensor.set_ready_timeout(1, 3);
        // read queue stays empty: every status poll sees 0x00
        let err = sensor.raw_values(&mut NoopDelay).unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[test]
    fn raw_values_propagates_transport_errors() {
        let mut sensor = ready_sensor();
        sensor.i2c.fail = true;
        let err = sensor.raw_values(&mut NoopDelay).unwrap_err();
        assert!(matches!(err, Error::WriteReadError(_)));
    }

    #[test]
    fn same_axis_pair_is_rejected_before_any_bus_traffic() {
        let mut sensor = ready_sensor();
        let writes_after_init = sensor.i2c.writes.len();

        let err = sensor.heading(&mut NoopDelay, Axis::X, Axis::X).unwrap_err();
        assert!(matches!(err, Error::InvalidAxisPair));

        let err = sensor
            .calc_heading(Axis::Z, Axis::Z, &Mag::new(1, 2, 3))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAxisPair));

        assert_eq!(sensor.i2c.writes.len(), writes_after_init);
    }

    fn queue_sample(sensor: &mut Qmc5883l<MockBus>, x: i16, y: i16) {
        sensor.i2c.queue_read(&[STATUS_DRDY]);
        let mag = Mag::new(x, y, 0);
        sensor.i2c.queue_read(&mag.to_bytes());
    }

    #[test]
    fn heading_converges_after_two_spanning_samples() {
        let mut sensor = ready_sensor();

        queue_sample(&mut sensor, 100, 100);
        assert_eq!(sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap(), 0.0);

        queue_sample(&mut sensor, -100, -100);
        sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap();

        // windows are now [-100, 100] on both axes; the positive-X
        // extreme reads as heading 0
        queue_sample(&mut sensor, 100, 0);
        let heading = sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap();
        assert!(heading.abs() < 1e-5, "heading = {heading}");

        queue_sample(&mut sensor, 0, 100);
        let degrees = sensor
            .heading_degrees(&mut NoopDelay, Axis::X, Axis::Y)
            .unwrap();
        assert!((degrees - 90.0).abs() < 1e-3, "degrees = {degrees}");
    }

    #[test]
    fn declination_can_be_updated_at_runtime() {
        let mut sensor = ready_sensor();
        sensor.set_declination_degrees(90.0);

        queue_sample(&mut sensor, 100, 100);
        queue_sample(&mut sensor, -100, -100);
        queue_sample(&mut sensor, 100, 0);
        for _ in 0..2 {
            sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap();
        }
        let degrees = sensor
            .heading_degrees(&mut NoopDelay, Axis::X, Axis::Y)
            .unwrap();
        assert!((degrees - 90.0).abs() < 1e-3, "degrees = {degrees}");
    }

    #[test]
    fn reset_calibration_returns_to_the_zero_heading_policy() {
        let mut sensor = ready_sensor();
        queue_sample(&mut sensor, 100, 100);
        queue_sample(&mut sensor, -100, -100);
        for _ in 0..2 {
            sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap();
        }

        sensor.reset_calibration();
        queue_sample(&mut sensor, 70, -30);
        let heading = sensor.heading(&mut NoopDelay, Axis::X, Axis::Y).unwrap();
        assert_eq!(heading, 0.0);
    }

    #[test]
    fn status_helpers_decode_their_bits() {
        let mut sensor = ready_sensor();
        sensor.i2c.queue_read(&[STATUS_DRDY | STATUS_OVL]);
        assert!(sensor.is_data_ready().unwrap());
        sensor.i2c.queue_read(&[STATUS_DRDY | STATUS_OVL]);
        assert!(sensor.is_overflow().unwrap());
        sensor.i2c.queue_read(&[STATUS_DRDY | STATUS_OVL]);
        assert!(!sensor.is_data_skipped().unwrap());
        sensor.i2c.queue_read(&[STATUS_DOR]);
        assert!(sensor.is_data_skipped().unwrap());
    }

    #[test]
    fn temperature_is_little_endian_signed() {
        let mut sensor = ready_sensor();
        sensor.i2c.queue_read(&[0x18, 0xFC]); // -1000 raw, -10 °C of slope
        assert_eq!(sensor.temperature_raw().unwrap(), -1000);
    }

    #[test]
    fn chip_id_reads_register_0x0d() {
        let mut sensor = ready_sensor();
        sensor.i2c.queue_read(&[0xFF]);
        assert_eq!(sensor.chip_id().unwrap(), 0xFF);
        let bus = sensor.release();
        assert_eq!(bus.writes.last().unwrap(), &vec![0x0D]);
    }
}
