// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for depth frames and measurement results

use crate::constants::file_formats;
use crate::errors::{AppError, AppResult, FrameError};
use crate::spatial::{
    DepthBuffer, ImageSize, SpatialCoordinates, SpatialLocation, coordinates_as_bytes,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a depth frame, picking the decoder from the file extension
///
/// Raw dumps need `raw_size`; images carry their own dimensions. Anything
/// that is neither a raw dump nor a lossless image format is rejected.
pub fn load_depth_frame(path: &Path, raw_size: Option<ImageSize>) -> AppResult<DepthBuffer> {
    match raw_size {
        Some(size) => load_depth_raw(path, size),
        None if file_formats::is_raw_path(path) => Err(AppError::Other(format!(
            "{} is a raw depth dump; pass its size as WIDTHxHEIGHT",
            path.display()
        ))),
        None if file_formats::is_image_path(path) => load_depth_png(path),
        None => Err(FrameError::UnsupportedFormat(format!(
            "{} is not a depth image (expected one of: {})",
            path.display(),
            file_formats::IMAGE_EXTENSIONS.join(", ")
        ))
        .into()),
    }
}

/// Load a 16-bit grayscale image as millimeter depth
///
/// 8-bit images are rejected: they cannot carry millimeter depth.
pub fn load_depth_png(path: &Path) -> AppResult<DepthBuffer> {
    let img = image::open(path).map_err(FrameError::from)?;

    let depth = match img {
        image::DynamicImage::ImageLuma16(buf) => buf,
        other => {
            return Err(FrameError::UnsupportedFormat(format!(
                "{} is {:?}, expected 16-bit grayscale",
                path.display(),
                other.color()
            ))
            .into());
        }
    };

    let (width, height) = depth.dimensions();
    debug!(path = %path.display(), width, height, "Loaded depth image");
    Ok(DepthBuffer::new(depth.into_raw(), width, height)?)
}

/// Load a headerless dump of little-endian u16 samples
pub fn load_depth_raw(path: &Path, size: ImageSize) -> AppResult<DepthBuffer> {
    let bytes = std::fs::read(path)?;
    if bytes.len() != size.pixel_count() * 2 {
        return Err(FrameError::BufferSizeMismatch {
            expected: size.pixel_count(),
            actual: bytes.len() / 2,
        }
        .into());
    }

    let samples: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    debug!(path = %path.display(), %size, "Loaded raw depth dump");
    Ok(DepthBuffer::new(samples, size.width, size.height)?)
}

/// Save depth as a lossless 16-bit grayscale PNG
pub fn save_depth_png(buffer: &DepthBuffer, path: &Path) -> AppResult<()> {
    let size = buffer.size();
    let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
        size.width,
        size.height,
        buffer.data().to_vec(),
    )
    .ok_or("Failed to create 16-bit depth image")?;

    img.save(path)
        .map_err(|e| AppError::Storage(format!("Failed to save depth PNG: {}", e)))?;
    info!(path = %path.display(), %size, "Saved depth image");
    Ok(())
}

/// Timestamped output path, e.g. `spatial_20250101_120000.json`
pub fn default_output_path(dir: &Path, extension: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("spatial_{}.{}", timestamp, extension))
}

/// Write locations as pretty JSON
pub fn write_locations_json(locations: &[SpatialLocation], path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(locations)
        .map_err(|e| AppError::Other(format!("Failed to serialize locations: {}", e)))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), count = locations.len(), "Saved locations");
    Ok(())
}

/// Write coordinates as packed little-endian `f32` x/y/z triplets
pub fn write_coordinates_raw(locations: &[SpatialLocation], path: &Path) -> AppResult<()> {
    let coords: Vec<SpatialCoordinates> = locations.iter().map(|l| l.coordinates).collect();
    let bytes = if cfg!(target_endian = "little") {
        coordinates_as_bytes(&coords).to_vec()
    } else {
        coords
            .iter()
            .flat_map(|c| [c.x, c.y, c.z])
            .flat_map(f32::to_le_bytes)
            .collect()
    };
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), count = locations.len(), "Saved raw coordinates");
    Ok(())
}
