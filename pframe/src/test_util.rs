//! Shared fixtures for unit tests

use crate::buffer::{PixelBuffer, CHANNELS};

/// Deterministic linear congruential generator.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn next_u16(&mut self) -> u16 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 48) as u16
    }

    /// A value in `0.0..1.0`.
    pub fn next_unit(&mut self) -> f64 {
        self.next_u16() as f64 / 65536.0
    }
}

/// A picture filled with 16-bit scale noise, so no two blocks match.
pub fn noise_picture(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = Lcg::new(seed);
    let samples = (0..width * height * CHANNELS)
        .map(|_| rng.next_u16() as f64)
        .collect();

    PixelBuffer::from_samples(width, height, samples).unwrap()
}

/// Copy `picture`, replacing the block at `pos` with the content found at
/// `pos + (dx, dy)` (sampled bilinearly).
pub fn shift_block(picture: &PixelBuffer, pos: (usize, usize), dx: f64, dy: f64) -> PixelBuffer {
    let mut shifted = picture.clone();
    for y in pos.1..pos.1 + crate::types::BLOCK_SIZE {
        for x in pos.0..pos.0 + crate::types::BLOCK_SIZE {
            for c in 0..CHANNELS {
                let value = picture.get_bilinear(x as f64 + dx, y as f64 + dy, c);
                shifted.set(x, y, c, value);
            }
        }
    }

    shifted
}

/// Set every sample of the pixels in `xs` x `ys` to `value`.
pub fn fill_rect(
    picture: &mut PixelBuffer,
    xs: std::ops::Range<usize>,
    ys: std::ops::Range<usize>,
    value: f64,
) {
    for y in ys {
        for x in xs.clone() {
            for c in 0..CHANNELS {
                picture.set(x, y, c, value);
            }
        }
    }
}
