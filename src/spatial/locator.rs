// SPDX-License-Identifier: GPL-3.0-only

//! Spatial locator
//!
//! Ties the mapper and the aggregator together for detection and landmark
//! pipelines: points from a color or preview frame go in, camera-space
//! positions come out, one per input and in input order.

use super::aggregator::{CalculatorConfig, compute_region_depth, compute_region_depths};
use super::frame::{DepthBuffer, DepthFrame};
use super::intrinsics::CameraIntrinsics;
use super::mapper::{MappingConfig, map_point_to_roi};
use super::types::{ImageSize, NormalizedRect, Point2f, SpatialLocation};
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A keypoint in source-frame pixels with its detector confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    pub fn point(&self) -> Point2f {
        Point2f::new(self.x, self.y)
    }
}

/// Stateless spatial query front end
///
/// Holds only configuration. Every method borrows the depth frame for the
/// duration of the call, so one locator can serve many threads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialLocator {
    pub intrinsics: CameraIntrinsics,
    pub calculator: CalculatorConfig,
    pub mapping: MappingConfig,
    /// Landmarks scoring at or below this are not located
    pub landmark_score_threshold: f32,
}

impl SpatialLocator {
    pub fn new(config: &Config) -> Self {
        Self {
            intrinsics: config.intrinsics,
            calculator: config.calculator,
            mapping: config.mapping,
            landmark_score_threshold: config.landmark_score_threshold,
        }
    }

    /// Measure one normalized ROI
    pub fn locate(&self, frame: &DepthFrame<'_>, roi: &NormalizedRect) -> SpatialLocation {
        compute_region_depth(
            frame,
            roi,
            self.calculator.mode,
            self.calculator.validity_range(),
            &self.intrinsics,
        )
    }

    /// Measure many ROIs against the same frame
    pub fn locate_all(
        &self,
        frame: &DepthFrame<'_>,
        rois: &[NormalizedRect],
    ) -> Vec<SpatialLocation> {
        compute_region_depths(
            frame,
            rois,
            self.calculator.mode,
            self.calculator.validity_range(),
            &self.intrinsics,
        )
    }

    /// ROI in the depth frame around a point of a `source`-sized frame
    pub fn roi_for_point(
        &self,
        frame: &DepthFrame<'_>,
        point: Point2f,
        source: ImageSize,
    ) -> NormalizedRect {
        map_point_to_roi(point, source, frame.size(), &self.mapping)
    }

    /// Map a source-frame point into the depth frame and measure around it
    pub fn locate_point(
        &self,
        frame: &DepthFrame<'_>,
        point: Point2f,
        source: ImageSize,
    ) -> SpatialLocation {
        let roi = self.roi_for_point(frame, point, source);
        self.locate(frame, &roi)
    }

    /// Batch form of [`Self::locate_point`]
    pub fn locate_points(
        &self,
        frame: &DepthFrame<'_>,
        points: &[Point2f],
        source: ImageSize,
    ) -> Vec<SpatialLocation> {
        let rois: Vec<NormalizedRect> = points
            .iter()
            .map(|&p| self.roi_for_point(frame, p, source))
            .collect();
        self.locate_all(frame, &rois)
    }

    /// Locate landmarks, skipping those below the score threshold
    ///
    /// Output is aligned with the input: index `i` holds landmark `i`'s
    /// location or `None` when it was skipped.
    pub fn locate_landmarks(
        &self,
        frame: &DepthFrame<'_>,
        landmarks: &[Landmark],
        source: ImageSize,
    ) -> Vec<Option<SpatialLocation>> {
        let located: Vec<Option<SpatialLocation>> = landmarks
            .iter()
            .map(|lm| {
                (lm.score > self.landmark_score_threshold)
                    .then(|| self.locate_point(frame, lm.point(), source))
            })
            .collect();

        debug!(
            landmarks = landmarks.len(),
            located = located.iter().filter(|l| l.is_some()).count(),
            threshold = self.landmark_score_threshold,
            "Landmarks located"
        );

        located
    }

    /// Locate the centre of a detection box given in normalized source coordinates
    pub fn locate_detection(
        &self,
        frame: &DepthFrame<'_>,
        detection: &NormalizedRect,
        source: ImageSize,
    ) -> SpatialLocation {
        self.locate_point(frame, detection_center(detection, source), source)
    }

    /// Run a batch on the blocking pool
    ///
    /// Intended for async hosts. Returns an empty batch if the worker panics.
    pub async fn locate_async(
        &self,
        frame: Arc<DepthBuffer>,
        rois: Vec<NormalizedRect>,
    ) -> Vec<SpatialLocation> {
        let locator = *self;
        tokio::task::spawn_blocking(move || locator.locate_all(&frame.view(), &rois))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Spatial location task panicked");
                Vec::new()
            })
    }
}

/// Integer pixel centre of a normalized detection box
///
/// Corners are truncated to pixels first, then `x1 + (x2 - x1) / 2`.
pub fn detection_center(detection: &NormalizedRect, source: ImageSize) -> Point2f {
    let x1 = (detection.top_left.x * source.width as f32) as i64;
    let y1 = (detection.top_left.y * source.height as f32) as i64;
    let x2 = (detection.bottom_right.x * source.width as f32) as i64;
    let y2 = (detection.bottom_right.y * source.height as f32) as i64;
    Point2f::new((x1 + (x2 - x1) / 2) as f32, (y1 + (y2 - y1) / 2) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::types::AggregationMode;

    fn square_locator() -> SpatialLocator {
        SpatialLocator {
            mapping: MappingConfig {
                framing: crate::spatial::mapper::Framing::Stretch,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_detection_center() {
        let det = NormalizedRect::from_corners(0.1, 0.2, 0.5, 0.6);
        let c = detection_center(&det, ImageSize::new(300, 300));
        // x: 30..150 -> 90, y: 60..180 -> 120
        assert_eq!(c, Point2f::new(90.0, 120.0));
    }

    #[test]
    fn test_locate_point_measures_mapped_region() {
        let mut buffer = DepthBuffer::filled(200, 200, 3000).unwrap();
        buffer.fill_rect(90, 90, 20, 20, 800);

        let locator = square_locator();
        let loc = locator.locate_point(
            &buffer.view(),
            Point2f::new(50.0, 50.0),
            ImageSize::new(100, 100),
        );
        assert!(loc.is_measured());
        assert_eq!(loc.coordinates.z, 800.0);
    }

    #[test]
    fn test_locate_landmarks_respects_threshold() {
        let buffer = DepthBuffer::filled(100, 100, 1500).unwrap();
        let locator = SpatialLocator {
            landmark_score_threshold: 0.5,
            ..square_locator()
        };
        let landmarks = [
            Landmark::new(10.0, 10.0, 0.9),
            Landmark::new(20.0, 20.0, 0.5),
            Landmark::new(30.0, 30.0, 0.1),
            Landmark::new(40.0, 40.0, 0.7),
        ];
        let located =
            locator.locate_landmarks(&buffer.view(), &landmarks, ImageSize::new(100, 100));
        assert_eq!(located.len(), 4);
        assert!(located[0].is_some());
        assert!(located[1].is_none());
        assert!(located[2].is_none());
        assert_eq!(located[3].map(|l| l.coordinates.z), Some(1500.0));
    }

    #[test]
    fn test_locate_points_preserves_order() {
        let mut buffer = DepthBuffer::filled(100, 100, 0).unwrap();
        buffer.fill_rect(0, 0, 50, 100, 1000);
        buffer.fill_rect(50, 0, 50, 100, 2000);

        let locator = SpatialLocator {
            calculator: CalculatorConfig {
                mode: AggregationMode::Min,
                ..Default::default()
            },
            ..square_locator()
        };
        let points = [
            Point2f::new(80.0, 50.0),
            Point2f::new(20.0, 50.0),
            Point2f::new(75.0, 10.0),
        ];
        let locs = locator.locate_points(&buffer.view(), &points, ImageSize::new(100, 100));
        let depths: Vec<f32> = locs.iter().map(|l| l.coordinates.z).collect();
        assert_eq!(depths, vec![2000.0, 1000.0, 2000.0]);
    }

    #[tokio::test]
    async fn test_locate_async_matches_sync() {
        let mut buffer = DepthBuffer::filled(64, 48, 1200).unwrap();
        buffer.fill_rect(0, 0, 16, 16, 600);
        let rois = vec![
            NormalizedRect::from_corners(0.0, 0.0, 0.25, 0.25),
            NormalizedRect::from_corners(0.5, 0.5, 0.75, 0.75),
        ];

        let locator = SpatialLocator::default();
        let expected = locator.locate_all(&buffer.view(), &rois);
        let actual = locator.locate_async(Arc::new(buffer), rois).await;
        assert_eq!(actual, expected);
        assert_eq!(actual[0].coordinates.z, 600.0);
    }
}
