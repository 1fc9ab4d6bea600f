//! Predicted frame encoder.

mod cpu;
mod field;
mod source;
mod state;
mod types;

pub use cpu::gather;
pub use field::{Block, MotionField};
pub use source::{Reference, SourceSet};
pub use state::{EncodedFrame, PredictiveEncoder};
pub use types::EncoderOption;
