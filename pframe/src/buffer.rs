//! Real-valued RGB pixel storage

use num_traits::clamp;

/// Number of interleaved samples per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// A picture held as real-valued samples.
///
/// Samples are stored interleaved in row-major order, so sample `c` of the
/// pixel at `(x, y)` lives at `(y * width + x) * CHANNELS + c`. Values are
/// not required to be integral; decoded pictures use a 16-bit scale.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    samples: Vec<f64>,
}

/// One axis of a bilinear lookup: the two sample positions to blend and the
/// weight given to the nearer one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Tap {
    pub near: usize,
    pub far: usize,
    pub weight: f64,
}

impl Tap {
    /// Split a real coordinate into its blending taps, clamping it into
    /// `0..=len - 1` first.
    ///
    /// When the coordinate is already integral both taps coincide and the
    /// near sample is given the whole weight.
    fn new(coord: f64, len: usize) -> Self {
        let coord = clamp(coord, 0.0, len.saturating_sub(1) as f64);
        let near = coord.floor();
        let far = coord.ceil();
        let weight = if near == far { 1.0 } else { far - coord };

        Tap {
            near: near as usize,
            far: far as usize,
            weight,
        }
    }

    /// Blend the near and far samples of this tap.
    #[inline]
    pub fn blend(&self, near: f64, far: f64) -> f64 {
        near * self.weight + far * (1.0 - self.weight)
    }
}

impl PixelBuffer {
    /// Construct a black picture of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        let mut samples = Vec::new();
        samples.resize(width * height * CHANNELS, 0.0);

        Self {
            width,
            height,
            samples,
        }
    }

    /// Wrap already-interleaved samples.
    ///
    /// Yields `None` if `samples` does not hold exactly
    /// `width * height * CHANNELS` values.
    pub fn from_samples(width: usize, height: usize, samples: Vec<f64>) -> Option<Self> {
        if samples.len() != width * height * CHANNELS {
            return None;
        }

        Some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// All samples, interleaved and row-major.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Compute the flat index of a sample.
    ///
    /// Coordinates must satisfy `x < width`, `y < height` and
    /// `c < CHANNELS`; anything else is a caller error.
    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && c < CHANNELS);

        (y * self.width + x) * CHANNELS + c
    }

    /// Read a single sample.
    ///
    /// Panics if the coordinates fall outside the picture.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f64 {
        self.samples[self.index(x, y, c)]
    }

    /// Read all channels of one pixel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f64] {
        let start = self.index(x, y, 0);

        &self.samples[start..start + CHANNELS]
    }

    /// Write a single sample.
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f64) {
        let index = self.index(x, y, c);
        self.samples[index] = value;
    }

    /// Compute the horizontal and vertical taps for a bilinear lookup.
    pub(crate) fn taps(&self, x: f64, y: f64) -> (Tap, Tap) {
        (Tap::new(x, self.width), Tap::new(y, self.height))
    }

    /// Read a sample at a real-valued position, bilinearly blending the four
    /// surrounding samples.
    ///
    /// Positions outside the picture are clamped to its edge. At integral
    /// positions this returns exactly the stored sample.
    pub fn get_bilinear(&self, x: f64, y: f64, c: usize) -> f64 {
        let (tx, ty) = self.taps(x, y);

        let f11 = self.get(tx.near, ty.near, c);
        let f12 = self.get(tx.near, ty.far, c);
        let f21 = self.get(tx.far, ty.near, c);
        let f22 = self.get(tx.far, ty.far, c);

        let m1 = tx.blend(f11, f21);
        let m2 = tx.blend(f12, f22);

        ty.blend(m1, m2)
    }
}
