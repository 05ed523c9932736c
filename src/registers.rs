//! QMC5883L Register Map
//!
//! The QMC5883L exposes a compact 14-register map:
//! - Data registers: the three axis readings and die temperature,
//!   two bytes each in LSB-first order
//! - Status register: data-ready, overflow and data-skipped flags
//! - Control registers: measurement mode, output rate, range,
//!   over-sample ratio, interrupt/rollover behavior
//! - SET/RESET period register: must be written to 0x01 after power-up
//!   per the datasheet's recommended flow
//!
//! All field readings are 16-bit two's-complement values split across an
//! LSB/MSB register pair.

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Register {
    /// Low byte of the X-axis field reading
    XOutLsb = 0x00,
    /// High byte of the X-axis field reading
    XOutMsb = 0x01,
    /// Low byte of the Y-axis field reading
    YOutLsb = 0x02,
    /// High byte of the Y-axis field reading
    YOutMsb = 0x03,
    /// Low byte of the Z-axis field reading
    ZOutLsb = 0x04,
    /// High byte of the Z-axis field reading
    ZOutMsb = 0x05,

    /// Status register (0x06)
    /// Bit 0: DRDY, bit 1: OVL, bit 2: DOR
    Status = 0x06,

    /// Low byte of the die temperature reading
    TempLsb = 0x07,
    /// High byte of the die temperature reading
    TempMsb = 0x08,

    /// Control register 1 (0x09)
    /// Packs over-sample ratio, field range, output rate and mode
    Control1 = 0x09,

    /// Control register 2 (0x0A)
    /// Soft reset, pointer rollover and interrupt enable bits
    Control2 = 0x0A,

    /// SET/RESET period register (0x0B)
    /// The datasheet asks for 0x01 here before measuring
    SetResetPeriod = 0x0B,

    /// Reserved (0x0C)
    Reserved = 0x0C,

    /// Chip identification register (0x0D), reads 0xFF
    ChipId = 0x0D,
}

/// STATUS bit: a new sample is ready to read.
pub const STATUS_DRDY: u8 = 1 << 0;
/// STATUS bit: at least one axis saturated the ±range.
pub const STATUS_OVL: u8 = 1 << 1;
/// STATUS bit: a sample was skipped (read too slowly for the output rate).
pub const STATUS_DOR: u8 = 1 << 2;
