//! Objective fidelity metrics for comparing a reconstructed picture against
//! the picture it approximates.

pub mod fidelity;

pub use fidelity::{psnr, ssim, Fidelity};
