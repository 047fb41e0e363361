// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end tests for the spatial location engine

use depth_spatial::spatial::{
    CalculatorConfig, compute_region_depth, compute_region_depths, map_point_to_roi_legacy,
};
use depth_spatial::{
    AggregationMode, CameraIntrinsics, Config, DepthBuffer, DepthValidityRange, ImageSize,
    Landmark, MeasurementStatus, NormalizedRect, Point2f, SpatialLocator,
};

const TOLERANCE: f32 = 1e-3;

fn legacy_frame(depth_mm: u16) -> DepthBuffer {
    DepthBuffer::filled(1280, 720, depth_mm).unwrap()
}

#[test]
fn test_centre_block_average() {
    let buffer = legacy_frame(1000);
    // Exactly the 4x4 block around the frame centre
    let roi = NormalizedRect::from_corners(
        638.0 / 1280.0,
        358.0 / 720.0,
        642.0 / 1280.0,
        362.0 / 720.0,
    );

    let loc = compute_region_depth(
        &buffer.view(),
        &roi,
        AggregationMode::Average,
        DepthValidityRange::new(100.0, 50000.0),
        &CameraIntrinsics::default(),
    );

    assert_eq!(loc.valid_samples, 16);
    assert_eq!(loc.coordinates.z, 1000.0);
    assert!(loc.coordinates.x.abs() < TOLERANCE);
    assert!(loc.coordinates.y.abs() < TOLERANCE);
    assert_eq!(loc.status, MeasurementStatus::Measured);
}

#[test]
fn test_roi_outside_frame_is_no_data() {
    let buffer = legacy_frame(1000);
    let roi = NormalizedRect::from_corners(-0.5, -0.5, -0.1, -0.1);

    let loc = compute_region_depth(
        &buffer.view(),
        &roi,
        AggregationMode::Average,
        DepthValidityRange::new(100.0, 50000.0),
        &CameraIntrinsics::default(),
    );

    // Collapses onto the top-left corner; the half-open range visits nothing
    assert_eq!(loc.pixel_roi.xmin, 0);
    assert_eq!(loc.pixel_roi.xmax, 0);
    assert_eq!(loc.valid_samples, 0);
    assert_eq!(loc.coordinates.z, 0.0);
    assert_eq!(loc.status, MeasurementStatus::NoData);
    assert!(loc.clipped);
}

#[test]
fn test_partially_outside_roi_is_clipped_but_measured() {
    let buffer = legacy_frame(2500);
    let roi = NormalizedRect::from_corners(0.9, 0.9, 1.3, 1.3);

    let loc = compute_region_depth(
        &buffer.view(),
        &roi,
        AggregationMode::Min,
        DepthValidityRange::default(),
        &CameraIntrinsics::default(),
    );

    assert!(loc.clipped);
    assert!(loc.is_measured());
    assert_eq!(loc.pixel_roi.xmax, 1279);
    assert_eq!(loc.pixel_roi.ymax, 719);
    assert_eq!(loc.coordinates.z, 2500.0);
}

#[test]
fn test_min_of_three_values() {
    let mut buffer = DepthBuffer::filled(64, 64, 0).unwrap();
    buffer.fill_rect(8, 8, 4, 4, 500);
    buffer.fill_rect(20, 20, 4, 4, 300);
    buffer.fill_rect(40, 40, 4, 4, 700);

    let roi = NormalizedRect::from_corners(0.0, 0.0, 0.9, 0.9);
    let loc = compute_region_depth(
        &buffer.view(),
        &roi,
        AggregationMode::Min,
        DepthValidityRange::new(100.0, 5000.0),
        &CameraIntrinsics::default(),
    );

    assert_eq!(loc.coordinates.z, 300.0);
    assert_eq!(loc.valid_samples, 48);
    assert_eq!(loc.min_depth_position, Some((20, 20)));
}

#[test]
fn test_min_without_samples_reports_sentinel() {
    let buffer = DepthBuffer::filled(32, 32, 60000).unwrap();
    let roi = NormalizedRect::from_corners(0.2, 0.2, 0.8, 0.8);
    let loc = compute_region_depth(
        &buffer.view(),
        &roi,
        AggregationMode::Min,
        DepthValidityRange::default(),
        &CameraIntrinsics::default(),
    );

    assert_eq!(loc.coordinates.z, 50000.0);
    assert!(!loc.is_measured());
}

#[test]
fn test_batch_matches_single_calls() {
    let mut buffer = legacy_frame(0);
    buffer.fill_rect(100, 100, 200, 200, 900);
    buffer.fill_rect(900, 400, 200, 200, 1800);

    let rois = [
        NormalizedRect::from_corners(0.75, 0.6, 0.8, 0.7),
        NormalizedRect::from_corners(0.1, 0.15, 0.2, 0.3),
        NormalizedRect::from_corners(0.5, 0.5, 0.5, 0.5),
    ];
    let frame = buffer.view();
    let intrinsics = CameraIntrinsics::default();
    let range = DepthValidityRange::default();

    let batch = compute_region_depths(&frame, &rois, AggregationMode::Average, range, &intrinsics);
    assert_eq!(batch.len(), rois.len());
    for (roi, loc) in rois.iter().zip(&batch) {
        let single =
            compute_region_depth(&frame, roi, AggregationMode::Average, range, &intrinsics);
        assert_eq!(*loc, single);
    }
    assert_eq!(batch[0].coordinates.z, 1800.0);
    assert_eq!(batch[1].coordinates.z, 900.0);
    assert!(!batch[2].is_measured());
}

#[test]
fn test_preview_landmark_to_depth() {
    // 300x300 preview cropped from the centre of a 1280x720 depth frame
    let mut buffer = legacy_frame(3000);
    // Preview pixel (150, 75) lands at depth pixel (640, 180)
    buffer.fill_rect(600, 150, 80, 60, 1200);

    let locator = SpatialLocator::new(&Config::default());
    let source = ImageSize::new(300, 300);
    let frame = buffer.view();

    let loc = locator.locate_point(&frame, Point2f::new(150.0, 75.0), source);
    assert!(loc.is_measured());
    assert_eq!(loc.coordinates.z, 1200.0);
    assert!(loc.coordinates.x.abs() < 1.0);
    // Above the centre row, so y is positive
    assert!(loc.coordinates.y > 0.0);

    // Same ROI through the fixed-resolution entry point
    assert_eq!(map_point_to_roi_legacy(Point2f::new(150.0, 75.0), 300), loc.roi);
}

#[test]
fn test_landmarks_keep_positions() {
    let buffer = legacy_frame(2000);
    let locator = SpatialLocator {
        calculator: CalculatorConfig {
            mode: AggregationMode::Min,
            ..Default::default()
        },
        landmark_score_threshold: 0.2,
        ..SpatialLocator::new(&Config::default())
    };
    let landmarks = [
        Landmark::new(10.0, 10.0, 0.1),
        Landmark::new(100.0, 100.0, 0.9),
    ];

    let located = locator.locate_landmarks(&buffer.view(), &landmarks, ImageSize::new(256, 256));
    assert!(located[0].is_none());
    assert_eq!(located[1].map(|l| l.coordinates.z), Some(2000.0));
}

#[test]
fn test_detection_box_is_located_at_its_centre() {
    let mut buffer = legacy_frame(0);
    buffer.fill_rect(620, 340, 40, 40, 750);

    let locator = SpatialLocator::new(&Config::default());
    let detection = NormalizedRect::from_corners(0.4, 0.4, 0.6, 0.6);
    let loc = locator.locate_detection(&buffer.view(), &detection, ImageSize::new(300, 300));

    assert!(loc.is_measured());
    assert_eq!(loc.coordinates.z, 750.0);
}
