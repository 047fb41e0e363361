// SPDX-License-Identifier: GPL-3.0-only

//! Sensor and engine constants - single source of truth
//!
//! The legacy values describe the stereo depth sensor the engine was first
//! tuned for (1280x720 depth, 73.5 degree mono HFOV). They are only defaults:
//! every call site takes its intrinsics and thresholds from [`crate::Config`].

/// Legacy depth frame width (pixels)
pub const LEGACY_DEPTH_WIDTH: u32 = 1280;
/// Legacy depth frame height (pixels)
pub const LEGACY_DEPTH_HEIGHT: u32 = 720;

/// Mono camera horizontal field of view (degrees)
pub const LEGACY_HFOV_DEG: f32 = 73.5;

/// Depth validity window (millimeters, both bounds exclusive)
pub const DEPTH_THRESHOLD_LOW_MM: f32 = 100.0;
pub const DEPTH_THRESHOLD_HIGH_MM: f32 = 50000.0;

/// Depth reported by MIN aggregation when no sample was valid
pub const MIN_DEPTH_SENTINEL_MM: u16 = 50000;

/// Spatial ROI mapping constants
pub mod roi {
    /// Half-size of the square ROI placed around a mapped point (normalized)
    pub const HALF_SIZE: f32 = 0.02;

    /// Distance kept between a mapped ROI and the image border (normalized)
    pub const EDGE_MARGIN: f32 = 0.01;

    /// Largest half-size that still fits inside the margins
    pub const MAX_HALF_SIZE: f32 = 0.49;
}

/// Depth frame file formats
pub mod file_formats {
    /// Extensions decoded as 16-bit grayscale images
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

    /// Extensions read as headerless little-endian u16 samples
    pub const RAW_EXTENSIONS: &[&str] = &["raw", "bin", "u16"];

    /// Check whether a path names a raw depth dump
    pub fn is_raw_path(path: &std::path::Path) -> bool {
        has_extension(path, RAW_EXTENSIONS)
    }

    /// Check whether a path names a depth image
    pub fn is_image_path(path: &std::path::Path) -> bool {
        has_extension(path, IMAGE_EXTENSIONS)
    }

    fn has_extension(path: &std::path::Path, extensions: &[&str]) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

/// Output formats for measured locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Packed little-endian `f32` x/y/z triplets
    Raw,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Raw];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Raw => "bin",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "raw" | "bin" => Ok(Self::Raw),
            _ => Err(format!("Unknown output format '{}' (expected json or raw)", s)),
        }
    }
}
