//! Test doubles shared across module tests.

use crate::render::glyphs::{GlyphBitmap, GlyphRasterizer};

/// Fixed-advance block rasterizer: every visible glyph is a filled
/// square sitting on the baseline, whitespace is an empty box of the
/// same advance. Deterministic and font-free, which keeps layout and
/// render tests hermetic.
#[derive(Default)]
pub(crate) struct BlockRasterizer;

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap {
        let side = px.round().max(1.0) as usize;
        let fill = if ch.is_whitespace() { 0u8 } else { 255u8 };
        GlyphBitmap {
            width: side,
            height: side,
            xmin: 0,
            ymin: 0,
            advance: (side + 1) as f32,
            coverage: vec![fill; side * side],
        }
    }
}
