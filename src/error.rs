//! Error types for blocking QMC5883L operations.

use core::fmt::{Debug, Formatter};
use embedded_hal::i2c::I2c;

/// Error during construction of the driver. Wraps [`Error`] and hands the
/// I2C bus back so it can be reused or retried.
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct InitError<I>
where
    I: I2c,
{
    pub i2c: I,
    pub error: Error<I>,
}

impl<I> Debug for InitError<I>
where
    I: I2c,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.error.fmt(f)
    }
}

/// Error types that can occur during sensor operations.
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<I>
where
    I: I2c,
{
    /// Error occurred during an I2C write operation
    WriteError(I::Error),
    /// Error occurred during an I2C write-read operation
    WriteReadError(I::Error),
    /// Presence probe failed: nothing answered at the device address
    DeviceNotFound,
    /// The two heading axes must be distinct
    InvalidAxisPair,
    /// The data-ready flag did not appear within the poll deadline
    Timeout,
}

impl<I> Debug for Error<I>
where
    I: I2c,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::WriteError(e) => f.debug_tuple("WriteError").field(e).finish(),
            Self::WriteReadError(e) => f.debug_tuple("WriteReadError").field(e).finish(),
            Self::DeviceNotFound => f.write_str("DeviceNotFound"),
            Self::InvalidAxisPair => f.write_str("InvalidAxisPair"),
            Self::Timeout => f.write_str("Timeout"),
        }
    }
}
