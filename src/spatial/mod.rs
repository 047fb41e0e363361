// SPDX-License-Identifier: GPL-3.0-only

//! Spatial location engine
//!
//! Converts regions of a depth image into camera-relative 3D coordinates and
//! maps points from differently sized color frames into depth ROIs.
//!
//! Every operation here is a pure function of its arguments: no I/O, no
//! locks, no shared state. Queries against the same frame can run on as many
//! threads as the host likes.

mod aggregator;
mod frame;
mod intrinsics;
mod locator;
mod mapper;
mod types;

pub use aggregator::{CalculatorConfig, compute_region_depth, compute_region_depths};
pub use frame::{DepthBuffer, DepthFrame};
pub use intrinsics::CameraIntrinsics;
pub use locator::{Landmark, SpatialLocator, detection_center};
pub use mapper::{Framing, MappingConfig, map_point, map_point_to_roi, map_point_to_roi_legacy};
pub use types::{
    AggregationMode, DepthValidityRange, ImageSize, MeasurementStatus, NormalizedRect, PixelRect,
    Point2f, SpatialCoordinates, SpatialLocation,
};

/// View a batch of coordinates as packed native-endian `f32` triplets
pub fn coordinates_as_bytes(coordinates: &[SpatialCoordinates]) -> &[u8] {
    bytemuck::cast_slice(coordinates)
}
