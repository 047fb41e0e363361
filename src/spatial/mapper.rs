// SPDX-License-Identifier: GPL-3.0-only

//! Source-to-depth coordinate mapping
//!
//! Detections and landmarks arrive in the pixel space of a color or preview
//! frame. The mapper moves such a point into the depth frame and wraps it in
//! a small square ROI the aggregator can measure.

use super::intrinsics::CameraIntrinsics;
use super::types::{ImageSize, NormalizedRect, Point2f};
use crate::constants::roi;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How the source frame was cut from the target frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// Source is a square centre crop of a wider target. Both axes scale by
    /// the height ratio and x is shifted by `(target_w - target_h) / 2`.
    #[default]
    CenterCropSquare,
    /// Source covers the whole target. Each axis scales independently.
    Stretch,
}

impl std::str::FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "center-crop-square" | "center-crop" | "crop" => Ok(Self::CenterCropSquare),
            "stretch" => Ok(Self::Stretch),
            _ => Err(format!(
                "Unknown framing '{}' (expected center-crop-square or stretch)",
                s
            )),
        }
    }
}

/// ROI mapping settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Half-size of the square ROI (normalized target units)
    pub roi_half_size: f32,
    /// Minimum distance between the ROI and the image border
    pub edge_margin: f32,
    pub framing: Framing,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            roi_half_size: roi::HALF_SIZE,
            edge_margin: roi::EDGE_MARGIN,
            framing: Framing::default(),
        }
    }
}

/// Map a source-frame pixel to target-frame pixel coordinates
///
/// The result is rounded to the nearest target pixel.
pub fn map_point(
    point: Point2f,
    source: ImageSize,
    target: ImageSize,
    framing: Framing,
) -> Point2f {
    let tw = target.width as f32;
    let th = target.height as f32;

    let (x, y) = match framing {
        Framing::CenterCropSquare => {
            let ratio = th / source.height as f32;
            (point.x * ratio + (tw / 2.0 - th / 2.0), point.y * ratio)
        }
        Framing::Stretch => (
            point.x * (tw / source.width as f32),
            point.y * (th / source.height as f32),
        ),
    };

    Point2f::new(x.round(), y.round())
}

/// Clamp one normalized coordinate into `[low, high]`, sending NaN low
///
/// Requires `low <= high`; `f32::max` already maps NaN to `low`.
#[inline]
fn clamp_unit(value: f32, low: f32, high: f32) -> f32 {
    value.max(low).min(high)
}

/// Usable `[low, high]` band for an edge margin of any value
fn margin_bounds(edge_margin: f32) -> (f32, f32) {
    let low = if edge_margin.is_nan() {
        0.0
    } else {
        edge_margin.max(0.0).min(0.5)
    };
    (low, (1.0 - low).max(low))
}

/// Clamp an interval around `center` and re-expand it if clamping collapsed it
fn clamp_span(center: f32, half: f32, low: f32, high: f32) -> (f32, f32) {
    let half = half.max(0.0);
    let mut start = clamp_unit(center - half, low, high);
    let mut end = clamp_unit(center + half, low, high);
    if end <= start {
        if center >= 0.5 {
            end = high;
            start = clamp_unit(high - 2.0 * half, low, high);
        } else {
            start = low;
            end = clamp_unit(low + 2.0 * half, low, high);
        }
    }
    (start, end)
}

/// Build the normalized ROI around a source-frame point
///
/// Never fails. Every coordinate of the result lies in
/// `[edge_margin, 1 - edge_margin]`. With a positive half-size the rectangle
/// always has positive area, whatever the input (zero-sized frames and
/// non-finite points included). A point outside the frame yields a full-size box pressed
/// against the nearest border.
///
/// Margins outside `[0, 0.5]` are pulled into it and NaN counts as 0. A
/// margin of 0.5 leaves no room and gives an empty box at the centre.
pub fn map_point_to_roi(
    point: Point2f,
    source: ImageSize,
    target: ImageSize,
    config: &MappingConfig,
) -> NormalizedRect {
    let mapped = map_point(point, source, target, config.framing);
    let nx = mapped.x / target.width as f32;
    let ny = mapped.y / target.height as f32;

    let (low, high) = margin_bounds(config.edge_margin);
    let half = config.roi_half_size;

    let (x1, x2) = clamp_span(nx, half, low, high);
    let (y1, y2) = clamp_span(ny, half, low, high);

    trace!(
        point_x = point.x,
        point_y = point.y,
        mapped_x = mapped.x,
        mapped_y = mapped.y,
        %source,
        %target,
        "Mapped point to ROI"
    );

    NormalizedRect::from_corners(x1, y1, x2, y2)
}

/// Map into the nominal depth resolution with the default ROI settings
///
/// Only the source height matters for the centre-crop framing.
pub fn map_point_to_roi_legacy(point: Point2f, source_height: u32) -> NormalizedRect {
    let intrinsics = CameraIntrinsics::default();
    map_point_to_roi(
        point,
        ImageSize::new(source_height, source_height),
        intrinsics.resolution(),
        &MappingConfig::default(),
    )
}
