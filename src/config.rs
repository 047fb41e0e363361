// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::roi;
use crate::errors::{AppResult, ConfigError};
use crate::spatial::{CalculatorConfig, CameraIntrinsics, MappingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application directory name under the user config dir
const APP_DIR: &str = "depth-spatial";
const CONFIG_FILE: &str = "config.json";

/// Engine configuration
///
/// Passed explicitly into each query; nothing here is process-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Depth camera intrinsics (HFOV and nominal resolution)
    pub intrinsics: CameraIntrinsics,
    /// Aggregation mode and depth validity window
    pub calculator: CalculatorConfig,
    /// ROI size, margins and framing for point mapping
    pub mapping: MappingConfig,
    /// Landmarks scoring at or below this are not located
    pub landmark_score_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            intrinsics: CameraIntrinsics::default(), // 1280x720, 73.5 deg HFOV
            calculator: CalculatorConfig::default(), // average over (100, 50000) mm
            mapping: MappingConfig::default(),       // 0.02 half-size, center crop
            landmark_score_threshold: 0.0,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or the default location
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::from)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Check every value is inside the range the engine supports
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hfov = self.intrinsics.hfov_deg;
        if !hfov.is_finite() || hfov <= 0.0 || hfov >= 180.0 {
            return Err(ConfigError::Invalid(format!(
                "hfov_deg must be in (0, 180), got {}",
                hfov
            )));
        }
        if self.intrinsics.width == 0 || self.intrinsics.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}",
                self.intrinsics.resolution()
            )));
        }

        let low = self.calculator.depth_threshold_low;
        let high = self.calculator.depth_threshold_high;
        if low.is_nan() || high.is_nan() || low >= high {
            return Err(ConfigError::Invalid(format!(
                "depth thresholds must satisfy low < high, got ({}, {})",
                low, high
            )));
        }

        let margin = self.mapping.edge_margin;
        if !(0.0..0.25).contains(&margin) {
            return Err(ConfigError::Invalid(format!(
                "edge_margin must be in [0, 0.25), got {}",
                margin
            )));
        }
        let half = self.mapping.roi_half_size;
        let max_half = roi::MAX_HALF_SIZE - margin;
        if !(half > 0.0 && half <= max_half) {
            return Err(ConfigError::Invalid(format!(
                "roi_half_size must be in (0, {}], got {}",
                max_half, half
            )));
        }

        if self.landmark_score_threshold.is_nan() {
            return Err(ConfigError::Invalid(
                "landmark_score_threshold must be a number".to_string(),
            ));
        }
        Ok(())
    }
}
