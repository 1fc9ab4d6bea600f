//! Motion search constants and motion vector types

use std::ops::{Add, Sub};

/// Width and height, in pixels, of one motion-compensated block.
///
/// Picture dimensions must be exact multiples of this value.
pub const BLOCK_SIZE: usize = 16;

/// Half-width, in whole pixels, of the integer search window.
pub const BLOCK_MAX_OFFSET: usize = 8;

/// Half-width of the sub-pixel refinement window (half a pixel).
pub const BLOCK_MAX_FRACT_OFFSET: QuarterPel = QuarterPel(2);

/// Step between sub-pixel refinement candidates, in pixels.
///
/// This is also the unit of `QuarterPel` and hence the fixed-point scale of
/// the motion raster.
pub const BLOCK_FRACT_STEP: f64 = 0.25;

/// Divisor that brings 16-bit scale samples into the `0..256` range used by
/// the fidelity metrics.
pub const SAMPLE_SCALE: f64 = 256.0;

/// Quarter-pixel motion vector component.
///
/// Every offset the search can produce is a whole number of refinement
/// steps, so storing the step count keeps vectors exact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuarterPel(i32);

impl From<f64> for QuarterPel {
    fn from(pixels: f64) -> Self {
        QuarterPel((pixels / BLOCK_FRACT_STEP).round() as i32)
    }
}

impl QuarterPel {
    pub const ZERO: Self = QuarterPel(0);

    // Construct a quarter-pel from some value that already contains
    // quarter-pel units.
    pub fn from_unit(unit: i32) -> Self {
        QuarterPel(unit)
    }

    /// Construct a quarter-pel from a whole pixel count.
    pub fn from_whole(pixels: i32) -> Self {
        QuarterPel(pixels * 4)
    }

    pub fn into_unit(self) -> i32 {
        self.0
    }

    /// The component as a (possibly fractional) pixel offset.
    pub fn into_pixels(self) -> f64 {
        self.0 as f64 * BLOCK_FRACT_STEP
    }
}

impl Add for QuarterPel {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        QuarterPel(self.0 + rhs.0)
    }
}

impl Sub for QuarterPel {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        QuarterPel(self.0 - rhs.0)
    }
}

/// A motion vector consisting of X and Y components.
///
/// The vector points from a target block's anchor to the top-left corner of
/// the matching region in the reference picture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionVector(QuarterPel, QuarterPel);

impl MotionVector {
    pub fn zero() -> Self {
        Self(QuarterPel::ZERO, QuarterPel::ZERO)
    }

    pub fn x(self) -> QuarterPel {
        self.0
    }

    pub fn y(self) -> QuarterPel {
        self.1
    }

    /// Both components as pixel offsets.
    pub fn into_pixels(self) -> (f64, f64) {
        (self.0.into_pixels(), self.1.into_pixels())
    }
}

impl From<(QuarterPel, QuarterPel)> for MotionVector {
    fn from(vectors: (QuarterPel, QuarterPel)) -> Self {
        Self(vectors.0, vectors.1)
    }
}

impl From<MotionVector> for (QuarterPel, QuarterPel) {
    fn from(mv: MotionVector) -> Self {
        (mv.0, mv.1)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{MotionVector, QuarterPel};

    #[test]
    fn quarterpel_conversions() {
        assert_eq!(QuarterPel::from_whole(-3).into_unit(), -12);
        assert_eq!(QuarterPel::from(0.75).into_unit(), 3);
        assert_eq!(QuarterPel::from(-8.5).into_unit(), -34);
        assert_eq!(QuarterPel::from_unit(5).into_pixels(), 1.25);
        assert_eq!(
            QuarterPel::from_whole(2) - QuarterPel::from_unit(2),
            QuarterPel::from(1.5)
        );
    }

    #[test]
    fn motion_vector_pixels() {
        let mv: MotionVector = (QuarterPel::from_unit(-2), QuarterPel::from_whole(1)).into();
        assert_eq!(mv.into_pixels(), (-0.5, 1.0));
        assert_eq!(MotionVector::zero().into_pixels(), (0.0, 0.0));
    }
}
