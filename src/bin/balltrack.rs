//! balltrack CLI: track the ball through image sequences or single images.

use std::path::{Path, PathBuf};

use balltrack_rs::{
    BallDetector, DetectorConfig, ImageSequenceSource, TrackerPipeline, TuningProfile,
    integration::load_frame,
};
use clap::{Parser, Subcommand};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "balltrack")]
#[command(about = "Detect and track a table-tennis ball in video frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the ball through a directory of frames, sorted by file name.
    Track {
        /// Directory holding one image per frame.
        #[arg(long)]
        frames: PathBuf,

        /// Frame rate of the sequence.
        #[arg(long, default_value = "30.0")]
        fps: f64,

        /// Path to write the results (JSON). Printed to stdout when absent.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Built-in tuning profile: tracking or baseline.
        #[arg(long, default_value = "tracking")]
        profile: TuningProfile,

        /// JSON detector configuration, overrides --profile.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Detect the ball in a single image.
    Detect {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Built-in tuning profile: tracking or baseline.
        #[arg(long, default_value = "tracking")]
        profile: TuningProfile,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Track {
            frames,
            fps,
            output,
            profile,
            config,
        } => {
            let config = load_config(profile, config.as_deref())?;
            run_track(&frames, fps, output.as_deref(), config)
        }
        Commands::Detect { image, profile } => {
            run_detect(&image, DetectorConfig::from_profile(profile))
        }
    }
}

fn load_config(profile: TuningProfile, path: Option<&Path>) -> CliResult<DetectorConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            DetectorConfig::from_json_file(path)?
        }
        None => DetectorConfig::from_profile(profile),
    };
    config.validate()?;
    Ok(config)
}

fn run_track(
    frames_dir: &Path,
    fps: f64,
    output: Option<&Path>,
    config: DetectorConfig,
) -> CliResult<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("fps must be positive, got {fps}").into());
    }

    let mut source = ImageSequenceSource::open(frames_dir, fps)?;
    tracing::info!(
        "Tracking {} frames from {} at {} fps",
        source.remaining(),
        frames_dir.display(),
        fps
    );

    let result = TrackerPipeline::new(config)
        .process_source(&mut source)
        .inspect_err(|e| tracing::error!("Frame sequence aborted: {e}"))?;

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_detect(image_path: &Path, config: DetectorConfig) -> CliResult<()> {
    tracing::info!("Loading image: {}", image_path.display());
    let frame = load_frame(image_path)?;
    tracing::info!("Image size: {}x{}", frame.width(), frame.height());

    let fix = BallDetector::new(config).detect(&frame, None);
    let json = match fix {
        Some(fix) => serde_json::json!({
            "ball_position": fix.position,
            "confidence": fix.confidence,
            "channel": fix.channel,
        }),
        None => serde_json::json!({
            "ball_position": null,
            "confidence": 0.0,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
