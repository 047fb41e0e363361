// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame views
//!
//! [`DepthFrame`] borrows a caller-owned buffer for the duration of a query.
//! [`DepthBuffer`] owns one, for frames loaded from disk or handed to a
//! blocking task.

use super::types::ImageSize;
use crate::errors::FrameError;

/// Borrowed row-major grid of 16-bit depth samples in millimeters
///
/// The buffer length is checked against the dimensions on construction, so
/// every in-bounds pixel read is valid.
#[derive(Debug, Clone, Copy)]
pub struct DepthFrame<'a> {
    data: &'a [u16],
    width: u32,
    height: u32,
}

impl<'a> DepthFrame<'a> {
    pub fn new(data: &'a [u16], width: u32, height: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame);
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Depth sample at a pixel, `None` outside the frame
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// One image row
    #[inline]
    pub(crate) fn row(&self, y: u32) -> &'a [u16] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }
}

/// Owned depth frame
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    data: Vec<u16>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(data: Vec<u16>, width: u32, height: u32) -> Result<Self, FrameError> {
        // Validate through the view so both types share one set of rules
        DepthFrame::new(&data, width, height)?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Frame with every sample set to `depth_mm`
    pub fn filled(width: u32, height: u32, depth_mm: u16) -> Result<Self, FrameError> {
        Self::new(
            vec![depth_mm; width as usize * height as usize],
            width,
            height,
        )
    }

    pub fn view(&self) -> DepthFrame<'_> {
        DepthFrame {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Overwrite a rectangular block, clipped to the frame
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, depth_mm: u16) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            let start = row as usize * self.width as usize;
            for col in x..x_end {
                self.data[start + col as usize] = depth_mm;
            }
        }
    }

    /// Set a single pixel; ignored outside the frame
    pub fn set(&mut self, x: u32, y: u32, depth_mm: u16) {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = depth_mm;
        }
    }
}
