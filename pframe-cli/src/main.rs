//! pframe CLI - predicted frame encoder
//!
//! Encodes a target picture as per-block motion against a set of reference
//! pictures, or rebuilds a picture from such an encoding.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use pframe::{
    codec, EncoderOption, MotionRaster, PixelBuffer, PredictiveEncoder, Reference, SourceSet,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pframe")]
#[command(about = "Block-matching predicted frame encoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Log every block's motion decision
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads to use
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a target picture against reference pictures
    Encode {
        /// Reference pictures as comma-separated `path|id` pairs
        #[arg(short, long, value_delimiter = ',', required = true)]
        sources: Vec<SourceArg>,

        /// Target picture
        #[arg(short, long)]
        target: PathBuf,

        /// Output motion raster (PNG)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the motion-compensated reconstruction (PNG)
        #[arg(short, long)]
        debug: Option<PathBuf>,

        /// Skip quarter-pixel refinement
        #[arg(long)]
        no_subpel: bool,

        /// Search blocks on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Rebuild a picture from a motion raster and its reference pictures
    Reconstruct {
        /// Reference pictures as comma-separated `path|id` pairs
        #[arg(short, long, value_delimiter = ',', required = true)]
        sources: Vec<SourceArg>,

        /// Motion raster produced by `encode`
        #[arg(short, long)]
        motion: PathBuf,

        /// Output picture (PNG)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// A reference picture path with the id it is published under.
#[derive(Clone, Debug, PartialEq)]
struct SourceArg {
    path: PathBuf,
    id: u32,
}

impl FromStr for SourceArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, id) = s
            .rsplit_once('|')
            .ok_or_else(|| format!("expected `path|id`, got `{}`", s))?;
        let id = id
            .trim()
            .parse()
            .map_err(|e| format!("invalid reference id `{}`: {}", id, e))?;

        Ok(Self {
            path: PathBuf::from(path),
            id,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Map configuration errors onto the exit codes scripts expect.
fn exit_code(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<pframe::Error>() {
        Some(pframe::Error::DimensionMismatch { .. }) => 15,
        Some(pframe::Error::UnalignedDimensions { .. }) => 16,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(threads) = cli.threads {
        rayon_threads(threads)?;
    }

    match cli.command {
        Commands::Encode {
            sources,
            target,
            output,
            debug,
            no_subpel,
            sequential,
        } => {
            info!("Encoding {} -> {}", target.display(), output.display());
            let mut options = EncoderOption::default();
            options.set(EncoderOption::SUBPEL_REFINEMENT, !no_subpel);
            options.set(EncoderOption::PARALLEL_SEARCH, !sequential);
            cmd_encode(&sources, &target, &output, debug.as_deref(), options)
        }
        Commands::Reconstruct {
            sources,
            motion,
            output,
        } => {
            info!("Reconstructing {} -> {}", motion.display(), output.display());
            cmd_reconstruct(&sources, &motion, &output)
        }
    }
}

fn rayon_threads(threads: usize) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| anyhow!("Failed to initialize thread pool: {}", e))
}

/// Decode a picture into 16-bit scale samples.
fn load_picture(path: &Path) -> anyhow::Result<PixelBuffer> {
    let decoded = image::open(path).with_context(|| format!("Cannot decode {}", path.display()))?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);

    // 8-bit inputs are widened exactly; everything else goes through 16-bit.
    let color = decoded.color();
    let samples = if color.bytes_per_pixel() == color.channel_count() {
        pframe_raster::convert::rgba8_to_samples(decoded.to_rgba8().as_raw())
    } else {
        pframe_raster::convert::rgba16_to_samples(decoded.to_rgba16().as_raw())
    }
    .ok_or_else(|| anyhow!("Cannot convert {}", path.display()))?;
    let found = samples.len();

    PixelBuffer::from_samples(width, height, samples).ok_or_else(|| {
        pframe::Error::InvalidSampleCount {
            expected: width * height * pframe::CHANNELS,
            found,
        }
        .into()
    })
}

fn load_sources(sources: &[SourceArg]) -> anyhow::Result<SourceSet> {
    let references = sources
        .iter()
        .map(|source| Ok(Reference::new(source.id, load_picture(&source.path)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(SourceSet::new(references)?)
}

fn save_rgba(path: &Path, width: usize, height: usize, rgba: Vec<u8>) -> anyhow::Result<()> {
    let picture = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .ok_or_else(|| anyhow!("Picture buffer does not match {}x{}", width, height))?;

    picture
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Cannot write {}", path.display()))
}

fn save_picture(path: &Path, picture: &PixelBuffer) -> anyhow::Result<()> {
    let rgba = pframe_raster::convert::samples_to_rgba8(picture.samples());

    save_rgba(path, picture.width(), picture.height(), rgba)
}

fn cmd_encode(
    sources: &[SourceArg],
    target: &Path,
    output: &Path,
    debug: Option<&Path>,
    options: EncoderOption,
) -> anyhow::Result<()> {
    let sources = load_sources(sources)?;
    let target = load_picture(target)?;

    let frame = PredictiveEncoder::new(options).encode(&sources, &target)?;

    if let Some(debug) = debug {
        save_picture(debug, frame.reconstruction())?;
    }

    let fidelity = frame.fidelity();
    println!("PSNR: {:.2}dB", fidelity.psnr);
    println!("SSIM: {:.3}", fidelity.ssim);

    let raster = frame.raster();
    save_rgba(
        output,
        raster.width(),
        raster.height(),
        raster.as_rgba().to_vec(),
    )
}

fn cmd_reconstruct(sources: &[SourceArg], motion: &Path, output: &Path) -> anyhow::Result<()> {
    let sources = load_sources(sources)?;

    let decoded = image::open(motion)
        .with_context(|| format!("Cannot decode {}", motion.display()))?
        .to_rgba8();
    let raster = MotionRaster::from_rgba(
        decoded.width() as usize,
        decoded.height() as usize,
        decoded.as_raw(),
    )
    .ok_or_else(|| anyhow!("Cannot read motion raster {}", motion.display()))?;

    let field = codec::unpack(&raster, &sources)?;
    let picture = pframe::gather(&field, &sources)?;

    save_picture(output, &picture)
}
