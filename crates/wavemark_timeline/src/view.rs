// SPDX-License-Identifier: MIT OR Apache-2.0
//! Linear pixel/time mapping for the visible waveform view.

use serde::{Deserialize, Serialize};

/// Linear mapping between pixels and seconds for the visible view.
///
/// `frame_offset` is the left edge of the visible view in pixels from the
/// start of the waveform; `width` is the visible width in pixels. All
/// functions are pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewGeometry {
    pixels_per_second: f64,
    frame_offset: f64,
    width: f64,
}

impl ViewGeometry {
    /// Create a view geometry.
    ///
    /// `pixels_per_second` must be positive.
    pub fn new(pixels_per_second: f64, frame_offset: f64, width: f64) -> Self {
        debug_assert!(pixels_per_second > 0.0);
        Self {
            pixels_per_second,
            frame_offset,
            width,
        }
    }

    /// Convert a pixel position or distance to seconds
    pub fn pixels_to_time(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_second
    }

    /// Convert seconds to a pixel position or distance
    pub fn time_to_pixels(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    /// Left edge of the visible view, in pixels from the waveform start
    pub fn frame_offset(&self) -> f64 {
        self.frame_offset
    }

    /// Visible view width, in pixels
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Time at the left edge of the visible view
    pub fn start_time(&self) -> f64 {
        self.pixels_to_time(self.frame_offset)
    }

    /// Time at the right edge of the visible view
    pub fn end_time(&self) -> f64 {
        self.pixels_to_time(self.frame_offset + self.width)
    }

    /// Scroll the view to a new frame offset, in pixels
    pub fn set_frame_offset(&mut self, frame_offset: f64) {
        self.frame_offset = frame_offset.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let view = ViewGeometry::new(86.0, 0.0, 1000.0);
        let t = view.pixels_to_time(172.0);
        assert!((view.time_to_pixels(t) - 172.0).abs() < 1e-9);
    }

    #[test]
    fn test_visible_range_follows_frame_offset() {
        let mut view = ViewGeometry::new(100.0, 0.0, 1000.0);
        assert_eq!(view.start_time(), 0.0);
        assert_eq!(view.end_time(), 10.0);

        view.set_frame_offset(150.0);
        assert_eq!(view.start_time(), 1.5);
        assert_eq!(view.end_time(), 11.5);
    }

    #[test]
    fn test_frame_offset_never_negative() {
        let mut view = ViewGeometry::new(100.0, 0.0, 1000.0);
        view.set_frame_offset(-50.0);
        assert_eq!(view.frame_offset(), 0.0);
    }
}
