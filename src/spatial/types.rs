// SPDX-License-Identifier: GPL-3.0-only

//! Value types for spatial queries
//!
//! Everything here is plain copyable data computed fresh per query. Nothing
//! holds on to a depth frame past the call that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D point in either pixel or normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point2f {
    type Err = String;

    /// Parse a point in format "X,Y"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_floats(s)?;
        match values.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            _ => Err(format!("Expected point as X,Y, got '{}'", s)),
        }
    }
}

/// Image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    /// Parse a size in format "WIDTHxHEIGHT"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() == 2 {
            if let (Ok(width), Ok(height)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                return Ok(Self::new(width, height));
            }
        }
        Err(format!("Expected size as WIDTHxHEIGHT, got '{}'", s))
    }
}

/// Rectangle with corners relative to an image's width and height
///
/// Produced rectangles keep both corners inside `[0, 1]` with
/// `top_left < bottom_right`. Rectangles supplied by callers may be
/// degenerate or lie outside the image entirely; consumers clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub top_left: Point2f,
    pub bottom_right: Point2f,
}

impl NormalizedRect {
    pub const fn new(top_left: Point2f, bottom_right: Point2f) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Build from corner coordinates `(x1, y1)` and `(x2, y2)`
    pub const fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Point2f::new(x1, y1), Point2f::new(x2, y2))
    }

    /// Rectangle centre in normalized coordinates
    pub fn center(&self) -> Point2f {
        Point2f::new(
            (self.top_left.x + self.bottom_right.x) / 2.0,
            (self.top_left.y + self.bottom_right.y) / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Convert to pixel space, rounding each corner to the nearest pixel
    ///
    /// Clamps every bound independently into `[0, width-1] x [0, height-1]`.
    /// The second value reports whether any bound lay outside the image. A
    /// max edge of exactly `width` or `height` (normalized 1.0) is the image
    /// border and does not count. A zero-sized image yields an empty
    /// rectangle at the origin.
    pub fn denormalize(&self, size: ImageSize) -> (PixelRect, bool) {
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let w = size.width as f32;
        let h = size.height as f32;

        let (xmin, cx0) = clamp_pixel(self.top_left.x * w, max_x, max_x);
        let (ymin, cy0) = clamp_pixel(self.top_left.y * h, max_y, max_y);
        let (xmax, cx1) = clamp_pixel(self.bottom_right.x * w, max_x, size.width);
        let (ymax, cy1) = clamp_pixel(self.bottom_right.y * h, max_y, size.height);

        (
            PixelRect {
                xmin,
                ymin,
                xmax,
                ymax,
            },
            cx0 || cy0 || cx1 || cy1,
        )
    }
}

impl FromStr for NormalizedRect {
    type Err = String;

    /// Parse a rectangle in format "X1,Y1,X2,Y2"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_floats(s)?;
        match values.as_slice() {
            [x1, y1, x2, y2] => Ok(Self::from_corners(*x1, *y1, *x2, *y2)),
            _ => Err(format!("Expected rectangle as X1,Y1,X2,Y2, got '{}'", s)),
        }
    }
}

/// Round a denormalized coordinate and clamp it into `[0, max]`
///
/// Flags the value as clipped only beyond `[0, edge]`. `as i64` saturates
/// and maps NaN to zero, so any float is accepted.
fn clamp_pixel(value: f32, max: u32, edge: u32) -> (u32, bool) {
    let rounded = value.round() as i64;
    if rounded < 0 {
        (0, true)
    } else if rounded > i64::from(max) {
        (max, rounded > i64::from(edge))
    } else {
        (rounded as u32, false)
    }
}

fn parse_floats(s: &str) -> Result<Vec<f32>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("Invalid number '{}': {}", part.trim(), e))
        })
        .collect()
}

/// Rectangle in integer pixel coordinates, already clamped to the frame
///
/// Aggregation iterates the half-open ranges `[xmin, xmax)` and `[ymin, ymax)`.
/// Bounds are clamped independently, so `min > max` is possible for inverted
/// input and simply iterates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl PixelRect {
    /// Number of pixels the aggregator will visit
    pub fn area(&self) -> u64 {
        let width = u64::from(self.xmax.saturating_sub(self.xmin));
        let height = u64::from(self.ymax.saturating_sub(self.ymin));
        width * height
    }

    /// Integer midpoint, `(max - min) / 2 + min` on each axis
    pub fn midpoint(&self) -> (i64, i64) {
        let (xmin, xmax) = (i64::from(self.xmin), i64::from(self.xmax));
        let (ymin, ymax) = (i64::from(self.ymin), i64::from(self.ymax));
        ((xmax - xmin) / 2 + xmin, (ymax - ymin) / 2 + ymin)
    }
}

/// Camera-relative position in millimeters
///
/// `x` grows to the right, `y` grows upwards, `z` is the measured depth.
/// Laid out as three packed `f32` so batches can be handed to a host as bytes.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct SpatialCoordinates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Whether a location was backed by any valid depth sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementStatus {
    /// At least one sample fell inside the validity range
    Measured,
    /// No valid sample; the coordinates carry the mode's fallback depth
    NoData,
}

/// One measured region and its 3D position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialLocation {
    /// Region as requested by the caller
    pub roi: NormalizedRect,
    /// Region actually iterated, after clamping to the frame
    pub pixel_roi: PixelRect,
    pub coordinates: SpatialCoordinates,
    /// Number of samples that passed the validity range
    pub valid_samples: u32,
    pub status: MeasurementStatus,
    /// True when any ROI bound fell outside the frame
    ///
    /// A max edge on the frame border (normalized 1.0) is not clipping.
    pub clipped: bool,
    /// Pixel of the closest valid sample, if any
    pub min_depth_position: Option<(u32, u32)>,
}

impl SpatialLocation {
    /// True when the coordinates come from real samples
    pub fn is_measured(&self) -> bool {
        self.status == MeasurementStatus::Measured
    }
}

/// How valid samples inside a region collapse into one depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Integer mean of all valid samples
    #[default]
    Average,
    /// Closest valid sample
    Min,
}

impl AggregationMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            AggregationMode::Average => "average",
            AggregationMode::Min => "min",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" | "avg" | "mean" => Ok(Self::Average),
            "min" | "minimum" => Ok(Self::Min),
            _ => Err(format!("Unknown aggregation mode '{}' (expected average or min)", s)),
        }
    }
}

/// Exclusive depth window in millimeters: a sample is valid iff `low < d < high`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthValidityRange {
    pub low: f32,
    pub high: f32,
}

impl DepthValidityRange {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, sample: u16) -> bool {
        let d = f32::from(sample);
        self.low < d && d < self.high
    }
}

impl Default for DepthValidityRange {
    fn default() -> Self {
        Self::new(
            crate::constants::DEPTH_THRESHOLD_LOW_MM,
            crate::constants::DEPTH_THRESHOLD_HIGH_MM,
        )
    }
}
