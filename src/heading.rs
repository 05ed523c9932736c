//! Reduction of a calibrated field sample to a compass heading.
//!
//! The heading is the angle of the field projection onto the chosen axis
//! pair, measured from the first axis toward the second:
//! 1. Both axis values are recentered by the midpoint of their observed
//!    window and rescaled by its span, cancelling hard-iron offset and
//!    per-axis gain.
//! 2. `atan2` of the two normalized projections gives the magnetic
//!    heading; adding the declination turns it into a true heading.
//! 3. The result is wrapped into [0, 2π).
//!
//! While either axis window is still degenerate the heading is reported
//! as exactly 0: there is no defensible angle to report until the sensor
//! has seen two distinct values on both axes.

use core::f32::consts::PI;

use crate::axis::Axis;
use crate::calibration::Calibration;
use crate::mag::Mag;

const TWO_PI: f32 = 2.0 * PI;

/// Folds `mag` into `calibration` and computes the heading in radians.
///
/// The axes must be distinct; callers validate the pair before getting
/// here. Declination is in radians and assumed within ±2π, matching the
/// single-revolution wrap below.
pub(crate) fn compute(
    calibration: &mut Calibration,
    axis1: Axis,
    axis2: Axis,
    mag: &Mag,
    declination: f32,
) -> f32 {
    calibration.include(axis1, mag.along(axis1));
    calibration.include(axis2, mag.along(axis2));

    let bounds1 = calibration.bounds(axis1);
    let bounds2 = calibration.bounds(axis2);

    // Bail out until both windows have real width.
    if bounds1.is_degenerate() || bounds2.is_degenerate() {
        return 0.0;
    }

    let f1 = (mag.along(axis1) as f32 - bounds1.midpoint()) / bounds1.span();
    let f2 = (mag.along(axis2) as f32 - bounds2.midpoint()) / bounds2.span();

    let mut heading = libm::atan2f(f2, f1) + declination;

    while heading < 0.0 {
        heading += TWO_PI;
    }
    while heading >= TWO_PI {
        heading -= TWO_PI;
    }

    heading
}
