// SPDX-License-Identifier: GPL-3.0-only

//! Camera intrinsics and the angular pinhole model
//!
//! Spatial coordinates are derived from an ideal pinhole with square pixels
//! and a known horizontal field of view. A pixel offset `o` from the image
//! centre maps to the ray angle `atan(tan(hfov / 2) * o / (width / 2))`.
//! The vertical axis uses the same horizontal scale.

use super::types::ImageSize;
use crate::constants;
use serde::{Deserialize, Serialize};

/// Intrinsics needed by the spatial engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraIntrinsics {
    /// Horizontal field of view in degrees
    pub hfov_deg: f32,
    /// Nominal depth frame width, used by mapping call sites without a frame
    pub width: u32,
    /// Nominal depth frame height
    pub height: u32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            hfov_deg: constants::LEGACY_HFOV_DEG,
            width: constants::LEGACY_DEPTH_WIDTH,
            height: constants::LEGACY_DEPTH_HEIGHT,
        }
    }
}

impl CameraIntrinsics {
    /// HFOV in radians
    pub fn hfov_rad(&self) -> f32 {
        self.hfov_deg.to_radians()
    }

    /// Nominal depth resolution
    pub fn resolution(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Ray angle (radians) for a pixel offset from the centre of a frame
    /// `frame_width` pixels wide
    #[inline]
    pub fn offset_angle(&self, offset: f32, frame_width: u32) -> f32 {
        let half_width = frame_width as f32 / 2.0;
        if half_width <= 0.0 {
            return 0.0;
        }
        ((self.hfov_rad() / 2.0).tan() * offset / half_width).atan()
    }
}
