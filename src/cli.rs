// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for spatial queries
//!
//! This module provides command-line functionality for:
//! - Measuring ROIs in a depth frame
//! - Mapping and measuring source-frame points
//! - Generating synthetic depth frames

use depth_spatial::constants::OutputFormat;
use depth_spatial::spatial::map_point_to_roi;
use depth_spatial::storage;
use depth_spatial::{
    Config, DepthBuffer, ImageSize, NormalizedRect, Point2f, SpatialLocation, SpatialLocator,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Measure ROIs and print or save the results
pub fn locate(
    config: &Config,
    depth_path: &Path,
    raw_size: Option<ImageSize>,
    rois: &[NormalizedRect],
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let buffer = storage::load_depth_frame(depth_path, raw_size)?;
    let locator = SpatialLocator::new(config);
    let locations = locator.locate_all(&buffer.view(), rois);

    info!(
        frame = %buffer.size(),
        rois = rois.len(),
        mode = %config.calculator.mode,
        "Located regions"
    );

    match output {
        Some(path) => {
            // A directory gets a timestamped file inside it
            let path = if path.is_dir() {
                storage::default_output_path(&path, format.extension())
            } else {
                path
            };
            match format {
                OutputFormat::Json => storage::write_locations_json(&locations, &path)?,
                OutputFormat::Raw => storage::write_coordinates_raw(&locations, &path)?,
            }
            println!("Saved {} locations: {}", locations.len(), path.display());
        }
        None => print_locations(&locations)?,
    }

    Ok(())
}

/// Map source-frame points into the depth frame and print their locations
pub fn locate_points(
    config: &Config,
    depth_path: &Path,
    raw_size: Option<ImageSize>,
    source: ImageSize,
    points: &[Point2f],
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let buffer = storage::load_depth_frame(depth_path, raw_size)?;
    let locator = SpatialLocator::new(config);
    let locations = locator.locate_points(&buffer.view(), points, source);

    for (point, location) in points.iter().zip(&locations) {
        println!("{}", describe(point, location));
    }
    Ok(())
}

/// Print the depth ROI a source point maps to
pub fn map_point(
    config: &Config,
    point: Point2f,
    source: ImageSize,
    target: Option<ImageSize>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let target = target.unwrap_or_else(|| config.intrinsics.resolution());
    let roi = map_point_to_roi(point, source, target, &config.mapping);
    println!("{}", serde_json::to_string_pretty(&roi)?);
    Ok(())
}

/// Write a constant-depth frame
pub fn synth(
    config: &Config,
    output: &Path,
    size: Option<ImageSize>,
    depth_mm: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = size.unwrap_or_else(|| config.intrinsics.resolution());
    let buffer = DepthBuffer::filled(size.width, size.height, depth_mm)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    storage::save_depth_png(&buffer, output)?;
    println!("Depth frame saved: {} ({}, {} mm)", output.display(), size, depth_mm);
    Ok(())
}

/// Print the effective configuration as JSON
pub fn print_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if let Some(path) = Config::default_path() {
        println!();
        println!("Default config path: {}", path.display());
    }
    Ok(())
}

fn print_locations(locations: &[SpatialLocation]) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(locations)?);
    Ok(())
}

/// One-line summary, integer millimeters like the host payload
fn describe(point: &Point2f, location: &SpatialLocation) -> String {
    let c = location.coordinates;
    if location.is_measured() {
        format!(
            "({}, {}) -> X={} Y={} Z={} mm [{} samples]",
            point.x, point.y, c.x as i32, c.y as i32, c.z as i32, location.valid_samples
        )
    } else {
        format!("({}, {}) -> no depth data", point.x, point.y)
    }
}
