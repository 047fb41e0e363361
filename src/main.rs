// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use depth_spatial::constants::OutputFormat;
use depth_spatial::spatial::Framing;
use depth_spatial::{AggregationMode, Config, ImageSize, NormalizedRect, Point2f};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depth-spatial")]
#[command(about = "Measure 3D positions of image regions from depth frames")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Config file (default: ~/.config/depth-spatial/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure normalized ROIs in a depth frame
    Locate {
        /// Depth frame (16-bit PNG, or raw u16 with --raw)
        #[arg(short, long)]
        depth: PathBuf,

        /// Size of a raw depth dump (WIDTHxHEIGHT)
        #[arg(long)]
        raw: Option<ImageSize>,

        /// ROI as X1,Y1,X2,Y2 in normalized coordinates (repeatable)
        #[arg(short, long = "roi", required = true, allow_hyphen_values = true)]
        rois: Vec<NormalizedRect>,

        /// Aggregation mode (average or min)
        #[arg(short, long)]
        mode: Option<AggregationMode>,

        /// Exclusive lower depth bound in mm
        #[arg(long)]
        low: Option<f32>,

        /// Exclusive upper depth bound in mm
        #[arg(long)]
        high: Option<f32>,

        /// Output file (default: print JSON to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for --output (json or raw)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Map source-frame points into the depth frame and measure them
    Point {
        /// Depth frame (16-bit PNG, or raw u16 with --raw)
        #[arg(short, long)]
        depth: PathBuf,

        /// Size of a raw depth dump (WIDTHxHEIGHT)
        #[arg(long)]
        raw: Option<ImageSize>,

        /// Size of the frame the points come from (WIDTHxHEIGHT)
        #[arg(short, long)]
        source: ImageSize,

        /// Point as X,Y in source pixels (repeatable)
        #[arg(short, long = "point", required = true, allow_hyphen_values = true)]
        points: Vec<Point2f>,

        /// How the source frame was cut from the depth frame
        #[arg(long)]
        framing: Option<Framing>,
    },

    /// Show the depth ROI for a source-frame point without measuring
    Map {
        /// Point as X,Y in source pixels
        #[arg(short, long, allow_hyphen_values = true)]
        point: Point2f,

        /// Size of the frame the point comes from (WIDTHxHEIGHT)
        #[arg(short, long)]
        source: ImageSize,

        /// Depth frame size (default: configured resolution)
        #[arg(short, long)]
        target: Option<ImageSize>,

        /// How the source frame was cut from the depth frame
        #[arg(long)]
        framing: Option<Framing>,
    },

    /// Write a constant-depth 16-bit PNG for testing
    Synth {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Frame size (default: configured resolution)
        #[arg(short, long)]
        size: Option<ImageSize>,

        /// Depth in mm
        #[arg(short, long, default_value = "1000")]
        depth: u16,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depth_spatial=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Locate {
            depth,
            raw,
            rois,
            mode,
            low,
            high,
            output,
            format,
        } => {
            if let Some(mode) = mode {
                config.calculator.mode = mode;
            }
            if let Some(low) = low {
                config.calculator.depth_threshold_low = low;
            }
            if let Some(high) = high {
                config.calculator.depth_threshold_high = high;
            }
            config.validate()?;
            cli::locate(&config, &depth, raw, &rois, output, format)
        }
        Commands::Point {
            depth,
            raw,
            source,
            points,
            framing,
        } => {
            if let Some(framing) = framing {
                config.mapping.framing = framing;
            }
            cli::locate_points(&config, &depth, raw, source, &points)
        }
        Commands::Map {
            point,
            source,
            target,
            framing,
        } => {
            if let Some(framing) = framing {
                config.mapping.framing = framing;
            }
            cli::map_point(&config, point, source, target)
        }
        Commands::Synth {
            output,
            size,
            depth,
        } => cli::synth(&config, &output, size, depth),
        Commands::Config => cli::print_config(&config),
    }
}
