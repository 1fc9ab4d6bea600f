//! RGBA-to-sample conversion

/// Divisor that maps 16-bit scale samples back onto 8-bit values.
const SAMPLE_SCALE: f64 = 256.0;

/// Multiplier that widens an 8-bit value to 16-bit scale (`0xFF` becomes
/// `0xFFFF`).
const WIDEN_8_TO_16: f64 = 257.0;

fn clamp(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }

    if v < 0.0 {
        return 0;
    }

    if v > 255.0 {
        return 255;
    }

    v as u8
}

/// Convert RGBA 8-bit data into interleaved RGB samples at 16-bit scale.
///
/// Alpha is discarded. Yields `None` if the data is not a whole number of
/// pixels.
pub fn rgba8_to_samples(rgba: &[u8]) -> Option<Vec<f64>> {
    let pixels: &[[u8; 4]] = bytemuck::try_cast_slice(rgba).ok()?;

    Some(
        pixels
            .iter()
            .flat_map(|&[r, g, b, _a]| [r, g, b])
            .map(|v| v as f64 * WIDEN_8_TO_16)
            .collect(),
    )
}

/// Convert RGBA 16-bit data into interleaved RGB samples.
///
/// Alpha is discarded. Yields `None` if the data is not a whole number of
/// pixels.
pub fn rgba16_to_samples(rgba: &[u16]) -> Option<Vec<f64>> {
    let pixels: &[[u16; 4]] = bytemuck::try_cast_slice(rgba).ok()?;

    Some(
        pixels
            .iter()
            .flat_map(|&[r, g, b, _a]| [r, g, b])
            .map(f64::from)
            .collect(),
    )
}

/// Convert interleaved 16-bit scale RGB samples into an opaque RGBA 8-bit
/// picture.
///
/// Samples are scaled down and truncated; anything outside the 8-bit range
/// saturates. Trailing samples that do not form a whole pixel are ignored.
pub fn samples_to_rgba8(samples: &[f64]) -> Vec<u8> {
    let pixel_count = samples.len() / 3;
    let mut rgba = Vec::new();
    rgba.resize(pixel_count * 4, 0);

    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut rgba);
    for (pixel, rgb) in pixels.iter_mut().zip(samples.chunks_exact(3)) {
        *pixel = [
            clamp(rgb[0] / SAMPLE_SCALE),
            clamp(rgb[1] / SAMPLE_SCALE),
            clamp(rgb[2] / SAMPLE_SCALE),
            255,
        ];
    }

    rgba
}
