//! QMC5883L I2C Address
//!
//! Unlike its HMC5883L ancestor, the QMC5883L responds on a single fixed
//! 7-bit address: 0x0D. The newtype still exists so that boards with an
//! address translator in front of the sensor can override it.

/// 7-bit I2C address of a QMC5883L.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Address(pub u8);

impl Default for Address {
    /// Returns the fixed QMC5883L address (0x0D).
    fn default() -> Self {
        Self(0x0D)
    }
}

impl From<Address> for u8 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<u8> for Address {
    fn from(addr: u8) -> Self {
        Self(addr)
    }
}
