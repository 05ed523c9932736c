//! QMC5883L Measurement Configuration
//!
//! One control register (CONTROL1) packs the four measurement parameters:
//! - Over-sample ratio: internal samples averaged per reported value,
//!   trading noise for latency
//! - Field range: full-scale of the ±2 or ±8 gauss ADC window
//! - Output data rate: how often a fresh sample is produced
//! - Mode: standby or continuous measurement
//!
//! The enum discriminants below are the already-shifted register bit
//! patterns, so a configuration byte is just the OR of the four parts.

use core::f32::consts::PI;

/// Over-sample ratio (CONTROL1 bits 7:6).
///
/// Higher ratios average more internal samples per output value:
/// - Less noise
/// - More power and internal latency
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OverSampleRatio {
    /// 512 samples, lowest noise
    Osr512 = 0b0000_0000,
    /// 256 samples
    Osr256 = 0b0100_0000,
    /// 128 samples
    Osr128 = 0b1000_0000,
    /// 64 samples, lowest power
    Osr64 = 0b1100_0000,
}

/// Full-scale field range (CONTROL1 bit 4).
///
/// The ±2 gauss window gives finer resolution and suits compassing in the
/// Earth field (~0.5 gauss); ±8 gauss tolerates strong local fields such
/// as nearby motors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum FieldRange {
    /// ±2 gauss
    Gauss2 = 0b0000_0000,
    /// ±8 gauss
    Gauss8 = 0b0001_0000,
}

/// Output data rate (CONTROL1 bits 3:2).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OutputDataRate {
    /// 10 Hz
    Hz10 = 0b0000_0000,
    /// 50 Hz
    Hz50 = 0b0000_0100,
    /// 100 Hz
    Hz100 = 0b0000_1000,
    /// 200 Hz
    Hz200 = 0b0000_1100,
}

/// Measurement mode (CONTROL1 bits 1:0).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Mode {
    /// Registers hold the last sample, lowest power
    Standby = 0b0000_0000,
    /// Free-running sampling at the output data rate
    Continuous = 0b0000_0001,
}

/// Complete device configuration, written once during construction.
///
/// The defaults mirror a plain compassing setup: ±8 gauss, 10 Hz,
/// OSR 64, continuous mode, no declination correction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    pub oversampling: OverSampleRatio,
    pub range: FieldRange,
    pub data_rate: OutputDataRate,
    pub mode: Mode,
    /// Local magnetic declination in degrees. Non-zero values shift the
    /// reported heading from magnetic north to true north.
    pub declination_degrees: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oversampling: OverSampleRatio::Osr64,
            range: FieldRange::Gauss8,
            data_rate: OutputDataRate::Hz10,
            mode: Mode::Continuous,
            declination_degrees: 0.0,
        }
    }
}

impl Config {
    /// Packed CONTROL1 byte: `osr | range | rate | mode`.
    pub fn to_byte(&self) -> u8 {
        self.oversampling as u8 | self.range as u8 | self.data_rate as u8 | self.mode as u8
    }

    pub(crate) fn declination_radians(&self) -> f32 {
        self.declination_degrees / 180.0 * PI
    }
}
