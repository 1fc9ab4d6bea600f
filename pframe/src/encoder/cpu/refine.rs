//! Quarter-pixel motion refinement

use crate::buffer::PixelBuffer;
use crate::encoder::cpu::sad::block_sad_subpel;
use crate::encoder::cpu::search::{Candidate, SearchWindow};
use crate::types::{QuarterPel, BLOCK_MAX_FRACT_OFFSET};
use std::cmp::{max, min};
use tracing::trace;

/// Improve a whole-pixel match by searching fractional offsets around it.
///
/// Only `reference`, the picture that won the coarse search, is examined.
/// Offsets up to `BLOCK_MAX_FRACT_OFFSET` either side of the coarse match
/// are tried in quarter-pixel steps, clipped to the coarse `window`, with
/// the source column outermost. The match is only replaced by a strictly
/// lower SAD, so a perfect coarse match is never disturbed.
pub fn refine(
    reference: &PixelBuffer,
    target: &PixelBuffer,
    pos: (usize, usize),
    window: &SearchWindow,
    coarse: Candidate,
) -> Candidate {
    let anchor_x = QuarterPel::from_whole(pos.0 as i32);
    let anchor_y = QuarterPel::from_whole(pos.1 as i32);
    let matched_x = anchor_x + coarse.motion_vector.x();
    let matched_y = anchor_y + coarse.motion_vector.y();

    let min_x = max(
        matched_x - BLOCK_MAX_FRACT_OFFSET,
        QuarterPel::from_whole(window.min_x as i32),
    );
    let max_x = min(
        matched_x + BLOCK_MAX_FRACT_OFFSET,
        QuarterPel::from_whole(window.max_x as i32),
    );
    let min_y = max(
        matched_y - BLOCK_MAX_FRACT_OFFSET,
        QuarterPel::from_whole(window.min_y as i32),
    );
    let max_y = min(
        matched_y + BLOCK_MAX_FRACT_OFFSET,
        QuarterPel::from_whole(window.max_y as i32),
    );

    let mut best = coarse;
    for source_x in (min_x.into_unit()..=max_x.into_unit()).map(QuarterPel::from_unit) {
        for source_y in (min_y.into_unit()..=max_y.into_unit()).map(QuarterPel::from_unit) {
            let sad = block_sad_subpel(
                reference,
                (source_x.into_pixels(), source_y.into_pixels()),
                target,
                pos,
                best.sad,
            );

            if sad < best.sad {
                trace!(
                    "[{}, {}] refined to {:.2} {:.2} (SAD {} -> {})",
                    pos.0,
                    pos.1,
                    (source_x - anchor_x).into_pixels(),
                    (source_y - anchor_y).into_pixels(),
                    best.sad,
                    sad
                );

                best.sad = sad;
                best.motion_vector = (source_x - anchor_x, source_y - anchor_y).into();
            }
        }
    }

    best
}
