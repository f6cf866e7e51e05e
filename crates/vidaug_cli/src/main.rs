//! vidaug CLI for running augmentation pipelines on synthetic video batches.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use burn::prelude::*;
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidaug::prelude::{manual_seed, PipelineConfig, Seed, Transform, VideoBatch};

/// Backend used for the synthetic batches.
type CliBackend = NdArray;

#[derive(Parser)]
#[command(name = "vidaug")]
#[command(author, version)]
#[command(about = "Run video batch augmentation pipelines")]
#[command(long_about = "vidaug: per-clip random augmentation of video batches.

EXAMPLES:
  # Write the default pipeline to a file
  vidaug config > pipeline.json

  # Run it on a synthetic [8, 16, 3, 128, 171] batch
  vidaug run --config pipeline.json

  # Smaller batch, fixed seed, debug logging
  vidaug -vv run --config pipeline.json --batch 2 --frames 4 --seed 7

TRANSFORMS:
  HorizontalFlip  - mirror clips along the width axis
  FixedCrop       - pad, then crop a fixed-size window per clip
  ResizedCrop     - random area/aspect crop resized to a fixed size
  RandomErasing   - overwrite a random rectangle per clip
  Normalize       - per-channel (x - mean) / std")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a pipeline to a synthetic batch
    Run {
        /// Pipeline config (JSON)
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Number of clips
        #[arg(long, default_value = "8", value_name = "N")]
        batch: usize,

        /// Frames per clip
        #[arg(long, default_value = "16", value_name = "T")]
        frames: usize,

        /// Channels per frame
        #[arg(long, default_value = "3", value_name = "C")]
        channels: usize,

        /// Frame height
        #[arg(long, default_value = "128", value_name = "H")]
        height: usize,

        /// Frame width
        #[arg(long, default_value = "171", value_name = "W")]
        width: usize,

        /// Random seed, overriding the one in the config
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },
    /// Print the default pipeline config as JSON
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Run {
            config,
            batch,
            frames,
            channels,
            height,
            width,
            seed,
        } => handle_run(config, [batch, frames, channels, height, width], seed),
        Commands::Config => handle_config(),
    }
}

fn handle_config() -> Result<()> {
    let json = PipelineConfig::default()
        .to_json_string()
        .context("Failed to serialize default config")?;
    println!("{json}");
    Ok(())
}

fn handle_run(config_path: PathBuf, dims: [usize; 5], seed: Option<u64>) -> Result<()> {
    if dims.contains(&0) {
        bail!("All batch dimensions must be positive, got {dims:?}");
    }

    let mut config = PipelineConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load pipeline '{}'", config_path.display()))?;
    if seed.is_some() {
        config.seed = seed;
    }

    let seed = Seed::new(config.seed.unwrap_or(0));
    if config.seed.is_none() {
        manual_seed(seed);
    }

    let pipeline = config
        .build::<CliBackend, 5>()
        .context("Failed to build pipeline")?;
    tracing::info!(stages = ?pipeline.names().collect::<Vec<_>>(), "pipeline ready");

    let device = <CliBackend as Backend>::Device::default();
    let input = synthetic_batch(dims, seed.derive("input"), &device)?;

    println!("=== vidaug ===\n");
    println!("Pipeline:     {}", pipeline.names().collect::<Vec<_>>().join(" -> "));
    println!("Input shape:  {}", input.shape());

    let start = Instant::now();
    let output = pipeline.apply(input).context("Pipeline failed")?;
    let elapsed = start.elapsed();

    println!("Output shape: {}", output.shape());
    let values = output
        .into_inner()
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Failed to read output values: {e:?}"))?;
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    println!("Value range:  [{min:.4}, {max:.4}]");
    println!("Elapsed:      {:.2?}", elapsed);

    Ok(())
}

/// Uniform noise in `[0, 1)` drawn from a stream derived from the run seed.
fn synthetic_batch(
    dims: [usize; 5],
    seed: Seed,
    device: &<CliBackend as Backend>::Device,
) -> Result<VideoBatch<CliBackend, 5>> {
    let mut rng = seed.to_rng();
    let n: usize = dims.iter().product();
    let values: Vec<f32> = (0..n).map(|_| rng.gen::<f32>()).collect();
    let tensor = Tensor::from_data(TensorData::new(values, dims), device);
    Ok(VideoBatch::new(tensor)?)
}
