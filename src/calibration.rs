//! Running min/max compass calibration.
//!
//! A compass lives inside a distorted field: hard-iron offsets shift the
//! measurement ellipse away from the origin, so raw axis values cannot be
//! fed to `atan2` directly. This driver learns the offset online by
//! tracking the lowest and highest value ever observed per axis and
//! recentering/rescaling against that window. The window only ever widens;
//! a full horizontal rotation of the sensor is enough to make headings
//! meaningful.
//!
//! Bounds start in an explicit [`Bounds::Unset`] state rather than a
//! low == high == 0 sentinel, so a legitimate 0 reading cannot be mistaken
//! for "no data yet". State is owned by the driver instance that observed
//! the samples; nothing is shared between instances.

use crate::axis::Axis;

/// Observed value window of one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Bounds {
    /// No sample observed yet.
    Unset,
    /// Every sample so far fell inside `low..=high`.
    Spanning { low: i16, high: i16 },
}

impl Bounds {
    /// Widens the window to include `sample`. The first sample seeds a
    /// degenerate window with `low == high == sample`.
    pub fn include(&mut self, sample: i16) {
        *self = match *self {
            Bounds::Unset => Bounds::Spanning {
                low: sample,
                high: sample,
            },
            Bounds::Spanning { low, high } => Bounds::Spanning {
                low: low.min(sample),
                high: high.max(sample),
            },
        };
    }

    /// A window too narrow to normalize against: unset, or a single value.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Bounds::Unset => true,
            Bounds::Spanning { low, high } => low == high,
        }
    }

    pub(crate) fn midpoint(&self) -> f32 {
        match *self {
            Bounds::Unset => 0.0,
            Bounds::Spanning { low, high } => (high as f32 + low as f32) / 2.0,
        }
    }

    pub(crate) fn span(&self) -> f32 {
        match *self {
            Bounds::Unset => 0.0,
            Bounds::Spanning { low, high } => high as f32 - low as f32,
        }
    }
}

/// Per-instance calibration state: one window per physical axis.
///
/// Keying by axis (rather than by heading request) means every heading
/// computed on this instance keeps feeding the same three windows,
/// whichever axis pair it uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Calibration {
    bounds: [Bounds; 3],
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    pub const fn new() -> Self {
        Self {
            bounds: [Bounds::Unset; 3],
        }
    }

    pub fn include(&mut self, axis: Axis, sample: i16) {
        self.bounds[axis as usize].include(sample);
    }

    pub fn bounds(&self, axis: Axis) -> Bounds {
        self.bounds[axis as usize]
    }

    /// Discards everything learned so far.
    pub fn reset(&mut self) {
        self.bounds = [Bounds::Unset; 3];
    }
}
