//! Measurement axes of the magnetometer.

/// One of the three sensing axes.
///
/// Heading computation takes an ordered pair of distinct axes: the first
/// points toward the heading reference ("north"), the second 90° to its
/// left ("west").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}
