//! Block distortion (sum of absolute differences)

use crate::buffer::PixelBuffer;
use crate::types::BLOCK_SIZE;
use std::ops::ControlFlow;
use wide::f64x4;

/// Returned in place of a block's SAD once accumulation has been abandoned.
///
/// No genuine SAD compares less than this value, so a candidate that was
/// abandoned can never become the best match.
pub const SAD_EXCEEDED: f64 = f64::MAX;

/// Sum per-pixel distortions over one block, giving up as soon as the running
/// total exceeds `limit`.
///
/// Pixels are visited column by column (`u` outer, `v` inner). All terms are
/// non-negative, so abandoning the sum never discards a total that would
/// have come in at or under `limit`.
#[inline]
fn accumulate<F>(limit: f64, mut distortion: F) -> f64
where
    F: FnMut(usize, usize) -> f64,
{
    let folded = (0..BLOCK_SIZE)
        .flat_map(|u| (0..BLOCK_SIZE).map(move |v| (u, v)))
        .try_fold(0.0, |sum, (u, v)| {
            let sum = sum + distortion(u, v);
            if sum > limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(sum)
            }
        });

    match folded {
        ControlFlow::Continue(sum) => sum,
        ControlFlow::Break(()) => SAD_EXCEEDED,
    }
}

/// SAD between a block of `target` anchored at `target_pos` and an equally
/// sized block of `source` anchored at the whole-pixel `source_pos`.
///
/// Both blocks must lie fully inside their pictures.
pub fn block_sad(
    source: &PixelBuffer,
    source_pos: (usize, usize),
    target: &PixelBuffer,
    target_pos: (usize, usize),
    limit: f64,
) -> f64 {
    accumulate(limit, |u, v| {
        let s = source.pixel(source_pos.0 + u, source_pos.1 + v);
        let t = target.pixel(target_pos.0 + u, target_pos.1 + v);

        (t[0] - s[0]).abs() + (t[1] - s[1]).abs() + (t[2] - s[2]).abs()
    })
}

/// Load the three channels of a pixel into the low lanes of a vector.
#[inline]
fn load_rgb(picture: &PixelBuffer, x: usize, y: usize) -> f64x4 {
    let p = picture.pixel(x, y);

    f64x4::from([p[0], p[1], p[2], 0.0])
}

/// Bilinearly sample every channel of `picture` at once.
///
/// Lane `c` carries exactly what `PixelBuffer::get_bilinear(x, y, c)` would
/// return; the fourth lane is always zero.
#[inline]
fn sample_bilinear_rgb(picture: &PixelBuffer, x: f64, y: f64) -> f64x4 {
    let (tx, ty) = picture.taps(x, y);

    let f11 = load_rgb(picture, tx.near, ty.near);
    let f12 = load_rgb(picture, tx.near, ty.far);
    let f21 = load_rgb(picture, tx.far, ty.near);
    let f22 = load_rgb(picture, tx.far, ty.far);

    let wx = f64x4::splat(tx.weight);
    let wx_rest = f64x4::splat(1.0 - tx.weight);
    let wy = f64x4::splat(ty.weight);
    let wy_rest = f64x4::splat(1.0 - ty.weight);

    let m1 = f11 * wx + f21 * wx_rest;
    let m2 = f12 * wx + f22 * wx_rest;

    m1 * wy + m2 * wy_rest
}

/// SAD between a block of `target` anchored at `target_pos` and a block of
/// `source` anchored at the fractional position `source_pos`.
pub fn block_sad_subpel(
    source: &PixelBuffer,
    source_pos: (f64, f64),
    target: &PixelBuffer,
    target_pos: (usize, usize),
    limit: f64,
) -> f64 {
    accumulate(limit, |u, v| {
        let s = sample_bilinear_rgb(source, source_pos.0 + u as f64, source_pos.1 + v as f64);
        let t = load_rgb(target, target_pos.0 + u, target_pos.1 + v);
        let d = (t - s).abs().to_array();

        d[0] + d[1] + d[2]
    })
}
