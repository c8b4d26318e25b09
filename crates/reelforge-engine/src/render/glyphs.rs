//! Glyph rasterization behind a trait seam.
//!
//! Layout and rendering only ever see [`GlyphRasterizer`], so the font
//! backend can be swapped without touching the compositor. Production
//! uses fontdue; tests use deterministic block glyphs.

use crate::error::{EngineError, EngineResult};
use fontdue::{Font, FontSettings};
use std::collections::HashMap;

/// Scalar metrics for a run of text at one pixel size.
///
/// `ascent` and `descent` are both positive distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// One rasterized glyph: an 8-bit coverage bitmap plus placement metrics.
///
/// `xmin`/`ymin` follow fontdue's conventions: offsets of the bitmap's
/// lower-left corner relative to the pen position on the baseline.
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub advance: f32,
    pub coverage: Vec<u8>,
}

/// Seam between layout/rendering and the font backend.
pub trait GlyphRasterizer: Send + Sync {
    /// Rasterize one character at the given pixel size.
    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap;

    /// Measure a run of text at one pixel size.
    fn measure(&self, text: &str, px: f32) -> TextMetrics {
        let mut width = 0.0f32;
        let mut ascent = 0.0f32;
        let mut descent = 0.0f32;
        for ch in text.chars() {
            let glyph = self.rasterize(ch, px);
            ascent = ascent.max((glyph.height as i32 + glyph.ymin) as f32);
            descent = descent.max((-glyph.ymin) as f32);
            width += glyph.advance;
        }
        TextMetrics {
            width,
            ascent,
            descent,
        }
    }
}

/// fontdue-backed production rasterizer.
pub struct FontdueRasterizer {
    font: Font,
}

impl FontdueRasterizer {
    /// Parse an in-memory font file (TTF/OTF).
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| EngineError::InvalidFont(e.to_string()))?;
        Ok(Self { font })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(ch, px);
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            advance: metrics.advance_width,
            coverage,
        }
    }
}

/// Registry of font families available to the renderer.
///
/// The engine performs no file I/O; callers load font bytes however they
/// like and register them here. Resolving an unregistered family is a
/// configuration error raised before any frame is rendered.
#[derive(Default)]
pub struct FontLibrary {
    fonts: HashMap<String, Box<dyn GlyphRasterizer>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-memory font file under a family name.
    pub fn register(&mut self, family: impl Into<String>, bytes: &[u8]) -> EngineResult<()> {
        let rasterizer = FontdueRasterizer::from_bytes(bytes)?;
        self.fonts.insert(family.into(), Box::new(rasterizer));
        Ok(())
    }

    /// Register a custom rasterizer backend under a family name.
    pub fn register_rasterizer(
        &mut self,
        family: impl Into<String>,
        rasterizer: Box<dyn GlyphRasterizer>,
    ) {
        self.fonts.insert(family.into(), rasterizer);
    }

    /// Resolve a family or fail the clip before rendering starts.
    pub fn resolve(&self, family: &str) -> EngineResult<&dyn GlyphRasterizer> {
        self.fonts
            .get(family)
            .map(|r| r.as_ref())
            .ok_or_else(|| EngineError::FontNotFound(family.to_string()))
    }
}
