// SPDX-License-Identifier: GPL-3.0-only

//! depth-spatial - spatial location engine for depth cameras
//!
//! Attaches camera-relative 3D coordinates to 2D detections. Given a 16-bit
//! millimeter depth frame, the engine measures regions of interest and maps
//! points from differently sized color frames into the depth frame.
//!
//! # Architecture
//!
//! - [`spatial`]: the engine itself (aggregation, mapping, locator facade)
//! - [`config`]: intrinsics, thresholds and mapping settings
//! - [`storage`]: depth frame files and result export
//! - [`constants`]: legacy sensor defaults
//! - [`errors`]: error types for everything around the engine
//!
//! # Example
//!
//! ```
//! use depth_spatial::{DepthBuffer, NormalizedRect, SpatialLocator};
//!
//! let frame = DepthBuffer::filled(1280, 720, 1000).unwrap();
//! let roi = NormalizedRect::from_corners(0.45, 0.45, 0.55, 0.55);
//! let location = SpatialLocator::default().locate(&frame.view(), &roi);
//!
//! assert!(location.is_measured());
//! assert_eq!(location.coordinates.z, 1000.0);
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod spatial;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use spatial::{
    AggregationMode, CameraIntrinsics, DepthBuffer, DepthFrame, DepthValidityRange, ImageSize,
    Landmark, MeasurementStatus, NormalizedRect, Point2f, SpatialCoordinates, SpatialLocation,
    SpatialLocator,
};
