//! Crop rectangle computation for the vertical output format.

use reelforge_models::{AspectRatio, CropRect, Point};
use tracing::info;

/// Computes a ratio-correct crop rectangle for one source frame size.
pub struct CropCalculator {
    source_width: u32,
    source_height: u32,
    aspect: AspectRatio,
}

impl CropCalculator {
    pub fn new(source_width: u32, source_height: u32, aspect: AspectRatio) -> Self {
        Self {
            source_width,
            source_height,
            aspect,
        }
    }

    /// Largest ratio-correct crop, centered on `focus` on whichever axis
    /// has slack, shifted back inside the frame when centering would
    /// overflow. The rectangle is never resized after clamping, so the
    /// target ratio survives any input position.
    ///
    /// With no focus the crop centers on the frame. That is the silent
    /// degraded-input path, not an error.
    pub fn compute(&self, focus: Option<Point>) -> CropRect {
        let (width, height) = self.fitted_dimensions();

        let center = match focus {
            Some(point) => point,
            None => {
                info!(
                    source_width = self.source_width,
                    source_height = self.source_height,
                    "no position signal, using center crop"
                );
                Point::new(
                    self.source_width as f64 / 2.0,
                    self.source_height as f64 / 2.0,
                )
            }
        };

        let x = Self::clamp_axis(center.x, width, self.source_width);
        let y = Self::clamp_axis(center.y, height, self.source_height);
        CropRect::new(x, y, width, height)
    }

    /// Fit the target ratio inside the source: full height first, full
    /// width when the derived width would overflow. Derived dimensions
    /// truncate so rounding can never push the crop past the frame.
    fn fitted_dimensions(&self) -> (u32, u32) {
        let ratio = self.aspect.ratio();
        let mut height = self.source_height;
        let mut width = (height as f64 * ratio) as u32;
        if width > self.source_width {
            width = self.source_width;
            height = (width as f64 / ratio) as u32;
        }
        (width.max(1), height.max(1))
    }

    /// Center `size` on `center`, then shift fully back inside `[0, bound]`.
    fn clamp_axis(center: f64, size: u32, bound: u32) -> u32 {
        let max_offset = bound.saturating_sub(size) as f64;
        (center - size as f64 / 2.0).clamp(0.0, max_offset).round() as u32
    }
}
