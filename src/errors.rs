// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth-spatial
//!
//! The spatial math never fails; these cover the boundary around it: frame
//! construction, file I/O and configuration.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Depth frame errors
    Frame(FrameError),
    /// Configuration errors
    Config(ConfigError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Depth frame errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer length does not match width * height
    BufferSizeMismatch { expected: usize, actual: usize },
    /// Width or height is zero
    EmptyFrame,
    /// Image could not be decoded
    Decode(String),
    /// Image decoded but is not usable as depth
    UnsupportedFormat(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File is not valid JSON for the config schema
    Parse(String),
    /// A value is outside its allowed range
    Invalid(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Frame(e) => write!(f, "Depth frame error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::BufferSizeMismatch { expected, actual } => write!(
                f,
                "Buffer holds {} samples, expected {}",
                actual, expected
            ),
            FrameError::EmptyFrame => write!(f, "Frame has zero width or height"),
            FrameError::Decode(msg) => write!(f, "Decode failed: {}", msg),
            FrameError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Parse failed: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for FrameError {}
impl std::error::Error for ConfigError {}

impl From<FrameError> for AppError {
    fn from(err: FrameError) -> Self {
        AppError::Frame(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for FrameError {
    fn from(err: image::ImageError) -> Self {
        FrameError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nests_sub_errors() {
        let err: AppError = FrameError::BufferSizeMismatch {
            expected: 12,
            actual: 10,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Depth frame error: Buffer holds 10 samples, expected 12"
        );

        let err: AppError = ConfigError::Invalid("hfov_deg must be positive".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value: hfov_deg must be positive"
        );
    }

    #[test]
    fn test_io_error_is_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AppError::from(io), AppError::Storage(_)));
    }
}
