//! Predicted frame encoder core

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::codec::{self, MotionRaster};
use crate::encoder::cpu::{coarse_search, gather, refine, SearchWindow};
use crate::encoder::field::{Block, MotionField};
use crate::encoder::source::SourceSet;
use crate::encoder::types::EncoderOption;
use crate::error::{Error, Result};
use crate::types::{BLOCK_SIZE, SAMPLE_SCALE};
use enough::{Stop, Unstoppable};
use pframe_metrics::Fidelity;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Everything produced by encoding one predicted frame.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    field: MotionField,
    raster: MotionRaster,
    reconstruction: PixelBuffer,
    fidelity: Fidelity,
}

impl EncodedFrame {
    /// The per-block motion decisions.
    pub fn field(&self) -> &MotionField {
        &self.field
    }

    /// The motion field packed for storage.
    pub fn raster(&self) -> &MotionRaster {
        &self.raster
    }

    /// The target as a decoder would rebuild it from the references.
    pub fn reconstruction(&self) -> &PixelBuffer {
        &self.reconstruction
    }

    /// PSNR and SSIM of the reconstruction against the true target.
    pub fn fidelity(&self) -> Fidelity {
        self.fidelity
    }
}

/// Encodes a target picture as motion-compensated blocks of a set of
/// reference pictures.
#[derive(Copy, Clone, Debug, Default)]
pub struct PredictiveEncoder {
    /// External options enabled on this encoder.
    options: EncoderOption,
}

impl PredictiveEncoder {
    /// Construct a new `PredictiveEncoder`.
    pub fn new(options: EncoderOption) -> Self {
        Self { options }
    }

    /// Encode `target` against `sources`.
    ///
    /// See `encode_with_stop`.
    pub fn encode(&self, sources: &SourceSet, target: &PixelBuffer) -> Result<EncodedFrame> {
        self.encode_with_stop(sources, target, &Unstoppable)
    }

    /// Encode `target` against `sources`, checking `stop` before every block.
    ///
    /// The target must have the same dimensions as the references, and both
    /// dimensions must be non-zero multiples of `BLOCK_SIZE`. Once those hold
    /// the search cannot fail, so the only other error is cancellation.
    pub fn encode_with_stop(
        &self,
        sources: &SourceSet,
        target: &PixelBuffer,
        stop: &(dyn Stop + Sync),
    ) -> Result<EncodedFrame> {
        let (width, height) = validate_dimensions(sources, target)?;

        info!(
            "Size: {}x{}, {} reference(s)",
            width,
            height,
            sources.len()
        );

        let started = Instant::now();
        let field = self.estimate_motion(sources, target, stop)?;
        info!("Elapsed time: {} ms", started.elapsed().as_millis());

        let reconstruction = gather(&field, sources)?;
        let fidelity = Fidelity::measure(
            reconstruction.samples(),
            target.samples(),
            CHANNELS,
            SAMPLE_SCALE,
        );
        let raster = codec::pack(&field, sources)?;

        Ok(EncodedFrame {
            field,
            raster,
            reconstruction,
            fidelity,
        })
    }

    /// Search every block of the target and collect the results into a
    /// motion field.
    fn estimate_motion(
        &self,
        sources: &SourceSet,
        target: &PixelBuffer,
        stop: &(dyn Stop + Sync),
    ) -> Result<MotionField> {
        let blocks_per_row = target.width() / BLOCK_SIZE;
        let block_rows = target.height() / BLOCK_SIZE;
        let options = self.options;

        let search = |index: usize| -> Result<Block> {
            stop.check()?;

            let pos = (
                (index % blocks_per_row) * BLOCK_SIZE,
                (index / blocks_per_row) * BLOCK_SIZE,
            );

            Ok(search_block(sources, target, pos, options))
        };

        let block_count = blocks_per_row * block_rows;
        let blocks = if options.contains(EncoderOption::PARALLEL_SEARCH) {
            (0..block_count)
                .into_par_iter()
                .map(search)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..block_count).map(search).collect::<Result<Vec<_>>>()?
        };

        MotionField::from_blocks(blocks_per_row, block_rows, blocks).ok_or(
            Error::UnalignedDimensions {
                width: target.width(),
                height: target.height(),
            },
        )
    }
}

/// Check that all pictures agree in size and tile exactly into blocks.
fn validate_dimensions(sources: &SourceSet, target: &PixelBuffer) -> Result<(usize, usize)> {
    let expected = sources.dimensions();
    let found = target.dimensions();
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }

    let (width, height) = found;
    if width == 0 || height == 0 || width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(Error::UnalignedDimensions { width, height });
    }

    Ok(found)
}

/// Carry one block from the whole-pixel search through refinement.
fn search_block(
    sources: &SourceSet,
    target: &PixelBuffer,
    pos: (usize, usize),
    options: EncoderOption,
) -> Block {
    let window = SearchWindow::around(pos, target.dimensions());
    let mut best = coarse_search(sources, target, pos, &window);

    if options.contains(EncoderOption::SUBPEL_REFINEMENT) {
        let reference = sources.references()[best.source_index].picture();
        best = refine(reference, target, pos, &window, best);
    }

    let (dx, dy) = best.motion_vector.into_pixels();
    debug!(
        "[{}, {}] | {:.2} {:.2} ({})",
        pos.0, pos.1, dx, dy, best.source_index
    );

    Block {
        source_index: best.source_index,
        motion_vector: best.motion_vector,
    }
}
