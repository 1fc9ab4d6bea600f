//! Per-block motion field

use crate::types::{MotionVector, BLOCK_SIZE};

/// The motion decision for one block.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Search index of the reference picture the block is predicted from.
    pub source_index: usize,

    /// Offset from the block anchor to the matched region.
    pub motion_vector: MotionVector,
}

/// A grid of `Block`s, one per `BLOCK_SIZE` square of the picture.
///
/// Blocks are stored row-major, so the block at grid position `(bx, by)`
/// lives at `by * width + bx`.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionField {
    width: usize,
    height: usize,
    blocks: Vec<Block>,
}

impl MotionField {
    /// Wrap a fully-populated, row-major list of blocks.
    ///
    /// Yields `None` if `blocks` does not hold exactly `width * height`
    /// entries.
    pub fn from_blocks(width: usize, height: usize, blocks: Vec<Block>) -> Option<Self> {
        if blocks.len() != width * height {
            return None;
        }

        Some(Self {
            width,
            height,
            blocks,
        })
    }

    /// Width of the grid, in blocks.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid, in blocks.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the block at a grid position.
    pub fn get(&self, bx: usize, by: usize) -> &Block {
        debug_assert!(bx < self.width && by < self.height);

        &self.blocks[by * self.width + bx]
    }

    /// Get the block covering a pixel.
    pub fn block_at_pixel(&self, x: usize, y: usize) -> &Block {
        self.get(x / BLOCK_SIZE, y / BLOCK_SIZE)
    }
}
