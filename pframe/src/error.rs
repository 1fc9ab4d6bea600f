//! Error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no reference images were provided")]
    NoReferences,

    #[error("image dimensions are not equal: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("image dimensions {width}x{height} must be non-zero multiples of the block size")]
    UnalignedDimensions { width: usize, height: usize },

    #[error("reference id {0} does not fit in a motion raster byte")]
    ReferenceIdOutOfRange(u32),

    #[error("reference id {0} is used by more than one reference image")]
    DuplicateReferenceId(u32),

    #[error("sample buffer holds {found} samples, expected {expected}")]
    InvalidSampleCount { expected: usize, found: usize },

    #[error("motion field names reference index {0}, which is not in the source set")]
    InvalidSourceIndex(usize),

    #[error("motion raster names reference id {0}, which is not in the source set")]
    UnknownReferenceId(u8),

    #[error("motion raster is {found:?} blocks, expected {expected:?}")]
    RasterDimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("motion vector component does not fit in a motion raster byte")]
    MotionVectorOutOfRange,

    #[error("encoding cancelled: {0}")]
    Cancelled(enough::StopReason),
}

impl From<enough::StopReason> for Error {
    fn from(reason: enough::StopReason) -> Self {
        Self::Cancelled(reason)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
