//! Pure-rust predicted frame encoder for multi-view image sets

#[macro_use]
extern crate bitflags;

mod buffer;
pub mod codec;
mod encoder;
mod error;
mod types;

#[cfg(test)]
mod test_util;

pub use buffer::{PixelBuffer, CHANNELS};
pub use codec::MotionRaster;
pub use encoder::{
    gather, Block, EncodedFrame, EncoderOption, MotionField, PredictiveEncoder, Reference,
    SourceSet,
};
pub use error::{Error, Result};
pub use pframe_metrics::Fidelity;
pub use types::{
    MotionVector, QuarterPel, BLOCK_FRACT_STEP, BLOCK_MAX_FRACT_OFFSET, BLOCK_MAX_OFFSET,
    BLOCK_SIZE, SAMPLE_SCALE,
};
