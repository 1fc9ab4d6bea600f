//! PSNR and whole-image SSIM over interleaved sample slices.
//!
//! Both metrics take pictures as flat, interleaved sample slices of equal
//! length, plus a `scale` that every sample is divided by before
//! comparison. With 16-bit scale samples and a scale of 256, values land in
//! `0..256` and the peak value of 255 used below is meaningful.

use itertools::izip;

/// Peak sample value after scaling.
const MAX_VALUE: f64 = 255.0;

/// SSIM luminance stabilizer, `(0.01 * 255)^2`.
const C1: f64 = (0.01 * MAX_VALUE) * (0.01 * MAX_VALUE);

/// SSIM contrast stabilizer, `(0.03 * 255)^2`.
const C2: f64 = (0.03 * MAX_VALUE) * (0.03 * MAX_VALUE);

/// Fidelity of a reconstruction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fidelity {
    /// Peak signal-to-noise ratio, in decibels. Infinite for a perfect
    /// reconstruction.
    pub psnr: f64,

    /// Structural similarity, ideally in `-1.0..=1.0`.
    pub ssim: f64,
}

impl Fidelity {
    /// Measure both metrics at once.
    pub fn measure(reconstructed: &[f64], original: &[f64], channels: usize, scale: f64) -> Self {
        Self {
            psnr: psnr(reconstructed, original, scale),
            ssim: ssim(reconstructed, original, channels, scale),
        }
    }
}

/// Peak signal-to-noise ratio between two pictures.
///
/// The mean squared error is taken over every sample of every channel.
pub fn psnr(reconstructed: &[f64], original: &[f64], scale: f64) -> f64 {
    debug_assert_eq!(reconstructed.len(), original.len());

    let squared_error: f64 = izip!(reconstructed, original)
        .map(|(r, o)| {
            let d = o / scale - r / scale;
            d * d
        })
        .sum();
    let mse = squared_error / original.len() as f64;

    20.0 * MAX_VALUE.log10() - 10.0 * mse.log10()
}

/// Structural similarity of a single channel, treating the whole picture as
/// one window.
fn ssim_channel(
    reconstructed: &[f64],
    original: &[f64],
    channels: usize,
    channel: usize,
    scale: f64,
) -> f64 {
    let pairs = || {
        izip!(
            reconstructed.iter().skip(channel).step_by(channels),
            original.iter().skip(channel).step_by(channels)
        )
        .map(|(r, o)| (r / scale, o / scale))
    };

    let count = (original.len() / channels) as f64;

    let (r_sum, o_sum) = pairs().fold((0.0, 0.0), |(rs, os), (r, o)| (rs + r, os + o));
    let r_mean = r_sum / count;
    let o_mean = o_sum / count;

    let (r_var_sum, o_var_sum, cov_sum) =
        pairs().fold((0.0, 0.0, 0.0), |(rv, ov, cv), (r, o)| {
            let d_r = r - r_mean;
            let d_o = o - o_mean;
            (rv + d_r * d_r, ov + d_o * d_o, cv + d_r * d_o)
        });

    let r_var = r_var_sum / count;
    let o_var = o_var_sum / count;
    let cov = cov_sum / count;

    ((2.0 * r_mean * o_mean + C1) * (2.0 * cov + C2))
        / ((r_mean * r_mean + o_mean * o_mean + C1) * (r_var + o_var + C2))
}

/// Structural similarity between two pictures.
///
/// Unlike conventional SSIM, mean, variance and covariance are taken over
/// the entire picture rather than over sliding local windows. The result is
/// the unweighted average of the per-channel scores.
pub fn ssim(reconstructed: &[f64], original: &[f64], channels: usize, scale: f64) -> f64 {
    debug_assert_eq!(reconstructed.len(), original.len());
    debug_assert!(channels > 0 && original.len() % channels == 0);

    let total: f64 = (0..channels)
        .map(|c| ssim_channel(reconstructed, original, channels, c, scale))
        .sum();

    total / channels as f64
}
