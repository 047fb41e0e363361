// SPDX-License-Identifier: GPL-3.0-only

//! Region depth aggregation
//!
//! Reduces the valid samples inside an ROI to one depth and places the ROI's
//! pixel midpoint in camera space with the angular model from
//! [`CameraIntrinsics`].
//!
//! The ROI's right and bottom edges are exclusive: a rectangle denormalized
//! to `xmin..xmax` visits columns `xmin` up to `xmax - 1`. A rectangle that
//! collapses after clamping visits nothing and reports no data.

use super::frame::DepthFrame;
use super::intrinsics::CameraIntrinsics;
use super::types::{
    AggregationMode, DepthValidityRange, MeasurementStatus, NormalizedRect, PixelRect,
    SpatialCoordinates, SpatialLocation,
};
use crate::constants::MIN_DEPTH_SENTINEL_MM;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Aggregation settings passed into every calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub mode: AggregationMode,
    /// Exclusive lower depth bound (mm)
    pub depth_threshold_low: f32,
    /// Exclusive upper depth bound (mm)
    pub depth_threshold_high: f32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        let range = DepthValidityRange::default();
        Self {
            mode: AggregationMode::default(),
            depth_threshold_low: range.low,
            depth_threshold_high: range.high,
        }
    }
}

impl CalculatorConfig {
    pub fn validity_range(&self) -> DepthValidityRange {
        DepthValidityRange::new(self.depth_threshold_low, self.depth_threshold_high)
    }
}

/// Running statistics over one ROI
#[derive(Debug, Default)]
struct RegionStats {
    count: u32,
    sum: u64,
    /// Closest sample and its pixel
    min: Option<(u16, u32, u32)>,
}

impl RegionStats {
    fn collect(frame: &DepthFrame<'_>, rect: &PixelRect, range: DepthValidityRange) -> Self {
        let mut stats = Self::default();
        if rect.xmin >= rect.xmax || rect.ymin >= rect.ymax {
            return stats;
        }

        let (xmin, xmax) = (rect.xmin as usize, rect.xmax as usize);
        for y in rect.ymin..rect.ymax {
            let row = &frame.row(y)[xmin..xmax];
            for (offset, &sample) in row.iter().enumerate() {
                if !range.contains(sample) {
                    continue;
                }
                stats.count += 1;
                stats.sum += u64::from(sample);

                let x = (xmin + offset) as u32;
                // Ties resolve to the smallest column, then the smallest row
                let closer = match stats.min {
                    None => true,
                    Some((d, mx, _)) => sample < d || (sample == d && x < mx),
                };
                if closer {
                    stats.min = Some((sample, x, y));
                }
            }
        }
        stats
    }

    fn resolve(&self, mode: AggregationMode) -> u16 {
        match mode {
            AggregationMode::Average => {
                if self.count > 0 {
                    (self.sum / u64::from(self.count)) as u16
                } else {
                    0
                }
            }
            AggregationMode::Min => self.min.map(|(d, _, _)| d).unwrap_or(MIN_DEPTH_SENTINEL_MM),
        }
    }
}

/// Place a pixel-space midpoint at `depth` in camera coordinates
fn project_midpoint(
    frame: &DepthFrame<'_>,
    rect: &PixelRect,
    depth: u16,
    intrinsics: &CameraIntrinsics,
) -> SpatialCoordinates {
    let (xmid, ymid) = rect.midpoint();
    let bb_x = xmid - i64::from(frame.width() / 2);
    let bb_y = ymid - i64::from(frame.height() / 2);

    let angle_x = intrinsics.offset_angle(bb_x as f32, frame.width());
    let angle_y = intrinsics.offset_angle(bb_y as f32, frame.width());

    let z = f32::from(depth);
    SpatialCoordinates {
        x: z * angle_x.tan(),
        y: -z * angle_y.tan(),
        z,
    }
}

/// Measure one ROI against a depth frame
///
/// Never fails: out-of-frame and inverted ROIs are clamped and end up with
/// [`MeasurementStatus::NoData`]. With no valid samples AVERAGE reports a
/// depth of 0 and MIN reports [`MIN_DEPTH_SENTINEL_MM`].
pub fn compute_region_depth(
    frame: &DepthFrame<'_>,
    roi: &NormalizedRect,
    mode: AggregationMode,
    range: DepthValidityRange,
    intrinsics: &CameraIntrinsics,
) -> SpatialLocation {
    let (pixel_roi, clipped) = roi.denormalize(frame.size());
    let stats = RegionStats::collect(frame, &pixel_roi, range);
    let depth = stats.resolve(mode);
    let coordinates = project_midpoint(frame, &pixel_roi, depth, intrinsics);

    trace!(
        xmin = pixel_roi.xmin,
        ymin = pixel_roi.ymin,
        xmax = pixel_roi.xmax,
        ymax = pixel_roi.ymax,
        valid = stats.count,
        depth,
        "Region depth computed"
    );

    SpatialLocation {
        roi: *roi,
        pixel_roi,
        coordinates,
        valid_samples: stats.count,
        status: if stats.count > 0 {
            MeasurementStatus::Measured
        } else {
            MeasurementStatus::NoData
        },
        clipped,
        min_depth_position: stats.min.map(|(_, x, y)| (x, y)),
    }
}

/// Measure a batch of ROIs, output order matching input order
pub fn compute_region_depths(
    frame: &DepthFrame<'_>,
    rois: &[NormalizedRect],
    mode: AggregationMode,
    range: DepthValidityRange,
    intrinsics: &CameraIntrinsics,
) -> Vec<SpatialLocation> {
    let locations: Vec<SpatialLocation> = rois
        .iter()
        .map(|roi| compute_region_depth(frame, roi, mode, range, intrinsics))
        .collect();

    debug!(
        rois = locations.len(),
        measured = locations.iter().filter(|l| l.is_measured()).count(),
        %mode,
        "Region depth batch computed"
    );

    locations
}
