//! Geometry primitives shared between crop planning and rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A point in source-frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Target aspect ratio as a width:height rational.
///
/// Kept rational rather than a bare float so that 9:16 stays exact and
/// crop dimensions derive from integer terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// The 9:16 vertical short-form format.
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

/// Crop rectangle in source-frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    /// Left edge x-coordinate
    pub x: u32,
    /// Top edge y-coordinate
    pub y: u32,
    /// Crop width
    pub width: u32,
    /// Crop height
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// True when the rectangle lies fully within a `width`x`height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_ratio() {
        assert!((AspectRatio::PORTRAIT.ratio() - 0.5625).abs() < 1e-9);
        assert_eq!(AspectRatio::default(), AspectRatio::PORTRAIT);
    }

    #[test]
    fn crop_rect_edges_and_fit() {
        let rect = CropRect::new(656, 0, 607, 1080);
        assert_eq!(rect.right(), 1263);
        assert_eq!(rect.bottom(), 1080);
        assert!(rect.fits_within(1920, 1080));
        assert!(!rect.fits_within(1200, 1080));
    }
}
