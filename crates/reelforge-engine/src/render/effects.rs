//! Pure compositing layers for subtitle effects.
//!
//! Each layer is a function from (glyphs, position, color) to pixels on
//! an RGBA canvas. There is no shared drawing context: callers own the
//! canvas and apply layers in an explicit back-to-front order, which
//! keeps per-frame rendering deterministic and parallel-safe.

use super::glyphs::GlyphRasterizer;
use image::RgbaImage;
use reelforge_models::Color;

/// Source-over blend of one straight-alpha pixel.
fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, src: [u8; 4]) {
    if src[3] == 0 || x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let s = src[c] as f32;
        let d = dst[c] as f32;
        dst[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Draw `text` glyph by glyph with the pen starting at `(x, baseline)`.
pub(crate) fn draw_text(
    canvas: &mut RgbaImage,
    rasterizer: &dyn GlyphRasterizer,
    text: &str,
    x: f32,
    baseline: f32,
    px: f32,
    color: Color,
) {
    let mut pen_x = x;
    for ch in text.chars() {
        let glyph = rasterizer.rasterize(ch, px);
        let left = pen_x.round() as i32 + glyph.xmin;
        let top = baseline.round() as i32 - (glyph.height as i32 + glyph.ymin);
        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let coverage = glyph.coverage[gy * glyph.width + gx];
                if coverage == 0 {
                    continue;
                }
                blend_pixel(
                    canvas,
                    left + gx as i32,
                    top + gy as i32,
                    color.to_rgba(coverage),
                );
            }
        }
        pen_x += glyph.advance;
    }
}

/// Uniform border: the glyph pass repeated in a circular ring of offsets
/// around the base position. Drawn before the fill so the fill stays
/// sharp on top.
pub(crate) fn draw_text_outline(
    canvas: &mut RgbaImage,
    rasterizer: &dyn GlyphRasterizer,
    text: &str,
    x: f32,
    baseline: f32,
    px: f32,
    width: u32,
    color: Color,
) {
    let w = width as i32;
    for dy in -w..=w {
        for dx in -w..=w {
            if dx == 0 && dy == 0 {
                continue;
            }
            if dx * dx + dy * dy > w * w {
                continue;
            }
            draw_text(
                canvas,
                rasterizer,
                text,
                x + dx as f32,
                baseline + dy as f32,
                px,
                color,
            );
        }
    }
}

/// Soft halo: the text drawn into a scratch layer, Gaussian-blurred, and
/// composited beneath whatever the caller draws next.
pub(crate) fn draw_text_glow(
    canvas: &mut RgbaImage,
    rasterizer: &dyn GlyphRasterizer,
    text: &str,
    x: f32,
    baseline: f32,
    px: f32,
    radius: f32,
    color: Color,
) {
    let mut scratch = RgbaImage::new(canvas.width(), canvas.height());
    draw_text(&mut scratch, rasterizer, text, x, baseline, px, color);
    let blurred = image::imageops::blur(&scratch, radius.max(0.1));
    composite_over(canvas, &blurred);
}

/// Composite `layer` over `canvas`; both must share dimensions.
pub(crate) fn composite_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    debug_assert_eq!(canvas.dimensions(), layer.dimensions());
    for (x, y, pixel) in layer.enumerate_pixels() {
        blend_pixel(canvas, x as i32, y as i32, pixel.0);
    }
}

/// Filled rectangle with circular corners, used for the background box.
pub(crate) fn fill_rounded_rect(
    canvas: &mut RgbaImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    corner_radius: u32,
    color: Color,
) {
    let radius = corner_radius.min(width / 2).min(height / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    let rgba = color.to_rgba(255);

    for py in 0..h {
        for px in 0..w {
            // Distance test only matters inside the corner squares.
            let dx = (radius - px).max(px - (w - 1 - radius)).max(0);
            let dy = (radius - py).max(py - (h - 1 - radius)).max(0);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            blend_pixel(canvas, x + px, y + py, rgba);
        }
    }
}
