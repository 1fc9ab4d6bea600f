//! Exhaustive whole-pixel block search

use crate::buffer::PixelBuffer;
use crate::encoder::cpu::sad::{block_sad, SAD_EXCEEDED};
use crate::encoder::source::SourceSet;
use crate::types::{MotionVector, QuarterPel, BLOCK_MAX_OFFSET, BLOCK_SIZE};
use std::cmp::min;

/// The best match found for a block so far.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Distortion of this match.
    pub sad: f64,

    /// Search index of the matched reference.
    pub source_index: usize,

    /// Offset from the block anchor to the matched region.
    pub motion_vector: MotionVector,
}

/// Inclusive bounds on where a matched block's anchor may sit in a
/// reference picture.
///
/// The window extends `BLOCK_MAX_OFFSET` pixels either side of the target
/// block's anchor, clipped so that the matched block stays entirely inside
/// the picture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

impl SearchWindow {
    /// Construct the window for the block anchored at `pos` in a picture of
    /// the given dimensions.
    pub fn around(pos: (usize, usize), dimensions: (usize, usize)) -> Self {
        let (width, height) = dimensions;

        Self {
            min_x: pos.0.saturating_sub(BLOCK_MAX_OFFSET),
            max_x: min(pos.0 + BLOCK_MAX_OFFSET, width - BLOCK_SIZE),
            min_y: pos.1.saturating_sub(BLOCK_MAX_OFFSET),
            max_y: min(pos.1 + BLOCK_MAX_OFFSET, height - BLOCK_SIZE),
        }
    }
}

/// Find the whole-pixel match for the target block at `pos` across every
/// reference in `sources`.
///
/// Candidates are visited reference by reference, then by source column,
/// then by source row. Only a strictly lower SAD replaces the current best,
/// so among equally good matches the first one visited wins. Each candidate's
/// accumulation is abandoned as soon as it exceeds the best SAD so far.
pub fn coarse_search(
    sources: &SourceSet,
    target: &PixelBuffer,
    pos: (usize, usize),
    window: &SearchWindow,
) -> Candidate {
    let mut best = Candidate {
        sad: SAD_EXCEEDED,
        source_index: 0,
        motion_vector: MotionVector::zero(),
    };

    for (source_index, reference) in sources.iter().enumerate() {
        for source_x in window.min_x..=window.max_x {
            for source_y in window.min_y..=window.max_y {
                let sad = block_sad(
                    reference.picture(),
                    (source_x, source_y),
                    target,
                    pos,
                    best.sad,
                );

                if sad < best.sad {
                    best = Candidate {
                        sad,
                        source_index,
                        motion_vector: (
                            QuarterPel::from_whole(source_x as i32 - pos.0 as i32),
                            QuarterPel::from_whole(source_y as i32 - pos.1 as i32),
                        )
                            .into(),
                    };
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use crate::encoder::cpu::search::{coarse_search, SearchWindow};
    use crate::encoder::source::{Reference, SourceSet};
    use crate::test_util::{fill_rect, noise_picture, shift_block};
    use crate::types::{MotionVector, QuarterPel};

    #[test]
    fn window_is_clipped_to_picture() {
        assert_eq!(
            SearchWindow::around((0, 0), (64, 48)),
            SearchWindow {
                min_x: 0,
                max_x: 8,
                min_y: 0,
                max_y: 8
            }
        );
        assert_eq!(
            SearchWindow::around((32, 16), (64, 48)),
            SearchWindow {
                min_x: 24,
                max_x: 40,
                min_y: 8,
                max_y: 24
            }
        );
        assert_eq!(
            SearchWindow::around((48, 32), (64, 48)),
            SearchWindow {
                min_x: 40,
                max_x: 48,
                min_y: 24,
                max_y: 32
            }
        );
    }

    #[test]
    fn exact_match_at_zero_offset() {
        let picture = noise_picture(48, 48, 11);
        let sources = SourceSet::new(vec![
            Reference::new(0, noise_picture(48, 48, 12)),
            Reference::new(1, picture.clone()),
        ])
        .unwrap();

        let pos = (16, 16);
        let window = SearchWindow::around(pos, (48, 48));
        let best = coarse_search(&sources, &picture, pos, &window);

        assert_eq!(best.sad, 0.0);
        assert_eq!(best.source_index, 1);
        assert_eq!(best.motion_vector, MotionVector::zero());
    }

    #[test]
    fn finds_displaced_block() {
        let reference = noise_picture(48, 48, 13);
        let target = shift_block(&reference, (16, 16), -3.0, 5.0);
        let sources = SourceSet::new(vec![Reference::new(0, reference)]).unwrap();

        let pos = (16, 16);
        let best = coarse_search(&sources, &target, pos, &SearchWindow::around(pos, (48, 48)));

        assert_eq!(best.sad, 0.0);
        assert_eq!(
            best.motion_vector,
            (QuarterPel::from_whole(-3), QuarterPel::from_whole(5)).into()
        );
    }

    #[test]
    fn ties_go_to_first_reference() {
        let picture = noise_picture(32, 32, 14);
        let sources = SourceSet::new(vec![
            Reference::new(9, picture.clone()),
            Reference::new(4, picture.clone()),
        ])
        .unwrap();

        let pos = (0, 16);
        let best = coarse_search(&sources, &picture, pos, &SearchWindow::around(pos, (32, 32)));

        assert_eq!(best.source_index, 0);
        assert_eq!(best.motion_vector, MotionVector::zero());
    }

    #[test]
    fn ties_go_to_first_source_column() {
        // Flat patches at (8, 12) and (12, 8) both match the flat target
        // block exactly; scanning columns first reaches (8, 12) first.
        let flat = 1234.5;
        let mut reference = noise_picture(48, 48, 15);
        fill_rect(&mut reference, 8..24, 12..28, flat);
        fill_rect(&mut reference, 12..28, 8..24, flat);
        let mut target = noise_picture(48, 48, 16);
        fill_rect(&mut target, 16..32, 16..32, flat);
        let sources = SourceSet::new(vec![Reference::new(0, reference)]).unwrap();

        let pos = (16, 16);
        let window = SearchWindow::around(pos, (48, 48));
        assert_eq!((window.min_x, window.min_y), (8, 8));

        let best = coarse_search(&sources, &target, pos, &window);

        assert_eq!(best.sad, 0.0);
        assert_eq!(
            best.motion_vector,
            (QuarterPel::from_whole(-8), QuarterPel::from_whole(-4)).into()
        );
    }
}
