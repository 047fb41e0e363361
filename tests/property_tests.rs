// SPDX-License-Identifier: GPL-3.0-only

//! Property tests for clamping and aggregation invariants

use depth_spatial::spatial::{MappingConfig, compute_region_depth, map_point_to_roi};
use depth_spatial::{
    AggregationMode, CameraIntrinsics, DepthBuffer, DepthValidityRange, ImageSize, NormalizedRect,
    Point2f,
};
use proptest::prelude::*;

fn any_coord() -> impl Strategy<Value = f32> {
    prop_oneof![
        -2.0f32..3.0,
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
        any::<f32>(),
    ]
}

fn any_mode() -> impl Strategy<Value = AggregationMode> {
    prop_oneof![Just(AggregationMode::Average), Just(AggregationMode::Min)]
}

proptest! {
    #[test]
    fn denormalized_bounds_stay_inside_frame(
        w in 1u32..2000,
        h in 1u32..2000,
        x1 in any_coord(),
        y1 in any_coord(),
        x2 in any_coord(),
        y2 in any_coord(),
    ) {
        let rect = NormalizedRect::from_corners(x1, y1, x2, y2);
        let (px, _) = rect.denormalize(ImageSize::new(w, h));
        prop_assert!(px.xmin <= w - 1 && px.xmax <= w - 1);
        prop_assert!(px.ymin <= h - 1 && px.ymax <= h - 1);
    }

    #[test]
    fn mapped_roi_is_always_valid(
        px in -1e6f32..1e6,
        py in -1e6f32..1e6,
        sw in 0u32..4000,
        sh in 0u32..4000,
        tw in 0u32..4000,
        th in 0u32..4000,
    ) {
        let rect = map_point_to_roi(
            Point2f::new(px, py),
            ImageSize::new(sw, sh),
            ImageSize::new(tw, th),
            &MappingConfig::default(),
        );
        for v in [rect.top_left.x, rect.top_left.y, rect.bottom_right.x, rect.bottom_right.y] {
            prop_assert!((0.01..=0.99).contains(&v), "coordinate {} out of range", v);
        }
        prop_assert!(rect.top_left.x < rect.bottom_right.x);
        prop_assert!(rect.top_left.y < rect.bottom_right.y);
    }

    #[test]
    fn constant_region_average_is_exact(
        depth in 101u16..50000,
        x1 in 0.0f32..0.5,
        y1 in 0.0f32..0.5,
        dx in 0.05f32..0.5,
        dy in 0.05f32..0.5,
    ) {
        let buffer = DepthBuffer::filled(160, 90, depth).unwrap();
        let roi = NormalizedRect::from_corners(x1, y1, x1 + dx, y1 + dy);
        let loc = compute_region_depth(
            &buffer.view(),
            &roi,
            AggregationMode::Average,
            DepthValidityRange::new(100.0, 50000.0),
            &CameraIntrinsics::default(),
        );
        prop_assert!(loc.valid_samples > 0);
        prop_assert_eq!(loc.coordinates.z, f32::from(depth));
    }

    #[test]
    fn aggregation_never_panics(
        samples in prop::collection::vec(any::<u16>(), 12 * 8),
        x1 in any_coord(),
        y1 in any_coord(),
        x2 in any_coord(),
        y2 in any_coord(),
        mode in any_mode(),
    ) {
        let buffer = DepthBuffer::new(samples, 12, 8).unwrap();
        let roi = NormalizedRect::from_corners(x1, y1, x2, y2);
        let loc = compute_region_depth(
            &buffer.view(),
            &roi,
            mode,
            DepthValidityRange::default(),
            &CameraIntrinsics::default(),
        );
        prop_assert!(u64::from(loc.valid_samples) <= loc.pixel_roi.area());
        prop_assert_eq!(loc.is_measured(), loc.valid_samples > 0);
        if !loc.is_measured() && mode == AggregationMode::Average {
            prop_assert_eq!(loc.coordinates.z, 0.0);
        }
    }
}
