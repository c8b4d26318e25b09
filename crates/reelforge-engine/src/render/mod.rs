//! Per-frame subtitle overlay rendering.

pub mod effects;
pub mod glyphs;

use glyphs::GlyphRasterizer;
use image::RgbaImage;
use reelforge_models::{Effect, StyleProfile, SubtitleChunk};

use crate::style_engine::{frame_state, layout_words, FrameState, WordVisualState};

/// One transparent raster in the overlay sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Frame index within the clip, starting at 0.
    pub index: usize,
    /// Clip-local frame time in seconds.
    pub time: f64,
    /// Straight-alpha RGBA raster at the output resolution.
    pub image: RgbaImage,
}

impl OverlayFrame {
    /// True when no pixel carries any opacity.
    pub fn is_transparent(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }
}

/// Renders overlay frames for one clip with one style.
///
/// Holds only shared read-only state, so one renderer can serve many
/// frame times concurrently.
pub struct FrameRenderer<'a> {
    style: &'a StyleProfile,
    rasterizer: &'a dyn GlyphRasterizer,
    width: u32,
    height: u32,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        style: &'a StyleProfile,
        rasterizer: &'a dyn GlyphRasterizer,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            style,
            rasterizer,
            width,
            height,
        }
    }

    /// Render the overlay at clip-local time `t`.
    ///
    /// Output depends only on `(t, chunks, style)`: re-rendering any
    /// single frame is byte-identical to rendering it within the full
    /// sequence. A time with no active chunk yields a fully transparent
    /// frame.
    pub fn render_at(&self, index: usize, t: f64, chunks: &[SubtitleChunk]) -> OverlayFrame {
        let mut image = RgbaImage::new(self.width, self.height);

        if let FrameState::Active { chunk, .. } = frame_state(chunks, t) {
            let words = layout_words(
                &chunks[chunk],
                t,
                self.style,
                self.rasterizer,
                self.width,
                self.height,
            );
            self.draw_words(&mut image, &words);
        }

        OverlayFrame {
            index,
            time: t,
            image,
        }
    }

    /// Apply the style's effect layers back to front.
    fn draw_words(&self, image: &mut RgbaImage, words: &[WordVisualState]) {
        if words.is_empty() {
            return;
        }

        match &self.style.effect {
            Effect::Outline { width, color } => {
                for word in words {
                    effects::draw_text_outline(
                        image,
                        self.rasterizer,
                        &word.text,
                        word.x,
                        word.baseline,
                        word.font_size,
                        *width,
                        *color,
                    );
                }
                self.fill_pass(image, words);
            }
            Effect::Glow {
                outline_width,
                outline_color,
                color_active,
                color_inactive,
                radius,
            } => {
                // Halo first so every sharp pass sits on top of it.
                for word in words {
                    let glow = if word.active {
                        *color_active
                    } else {
                        *color_inactive
                    };
                    effects::draw_text_glow(
                        image,
                        self.rasterizer,
                        &word.text,
                        word.x,
                        word.baseline,
                        word.font_size,
                        *radius,
                        glow,
                    );
                }
                if *outline_width > 0 {
                    for word in words {
                        effects::draw_text_outline(
                            image,
                            self.rasterizer,
                            &word.text,
                            word.x,
                            word.baseline,
                            word.font_size,
                            *outline_width,
                            *outline_color,
                        );
                    }
                }
                self.fill_pass(image, words);
            }
            Effect::Background {
                color,
                padding,
                corner_radius,
            } => {
                self.draw_background_box(image, words, *color, *padding, *corner_radius);
                self.fill_pass(image, words);
            }
        }
    }

    fn fill_pass(&self, image: &mut RgbaImage, words: &[WordVisualState]) {
        for word in words {
            effects::draw_text(
                image,
                self.rasterizer,
                &word.text,
                word.x,
                word.baseline,
                word.font_size,
                word.color,
            );
        }
    }

    /// Padded rounded rectangle behind the measured bounds of the line.
    fn draw_background_box(
        &self,
        image: &mut RgbaImage,
        words: &[WordVisualState],
        color: reelforge_models::Color,
        padding: u32,
        corner_radius: u32,
    ) {
        let mut ascent = 0.0f32;
        let mut descent = 0.0f32;
        for word in words {
            let metrics = self.rasterizer.measure(&word.text, word.font_size);
            ascent = ascent.max(metrics.ascent);
            descent = descent.max(metrics.descent);
        }
        let left = words.first().map(|w| w.x).unwrap_or(0.0);
        let right = words
            .last()
            .map(|w| w.x + w.width)
            .unwrap_or(left);
        let baseline = words[0].baseline;
        let pad = padding as f32;

        let x = (left - pad).round() as i32;
        let y = (baseline - ascent - pad).round() as i32;
        let width = (right - left + 2.0 * pad).round().max(1.0) as u32;
        let height = (ascent + descent + 2.0 * pad).round().max(1.0) as u32;
        effects::fill_rounded_rect(image, x, y, width, height, corner_radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockRasterizer;
    use reelforge_models::{StyleLibrary, WordToken};

    fn chunks() -> Vec<SubtitleChunk> {
        vec![SubtitleChunk {
            tokens: vec![
                WordToken::new("never", 0.4, 1.0),
                WordToken::new("gonna", 1.0, 1.4),
                WordToken::new("give", 1.6, 2.2),
            ],
            start: 0.4,
            end: 2.2,
        }]
    }

    fn make_renderer<'a>(
        style: &'a reelforge_models::StyleProfile,
        rasterizer: &'a BlockRasterizer,
    ) -> FrameRenderer<'a> {
        FrameRenderer::new(style, rasterizer, 1080, 1920)
    }

    #[test]
    fn idle_time_renders_fully_transparent() {
        let library = StyleLibrary::builtin();
        let style = library.get("clean_caption").unwrap();
        let rasterizer = BlockRasterizer::default();
        let renderer = make_renderer(style, &rasterizer);

        let frame = renderer.render_at(0, 0.0, &chunks());
        assert!(frame.is_transparent());
        assert_eq!(frame.image.dimensions(), (1080, 1920));
    }

    #[test]
    fn active_time_renders_visible_pixels() {
        let library = StyleLibrary::builtin();
        let style = library.get("clean_caption").unwrap();
        let rasterizer = BlockRasterizer::default();
        let renderer = make_renderer(style, &rasterizer);

        let frame = renderer.render_at(30, 1.0, &chunks());
        assert!(!frame.is_transparent());
    }

    #[test]
    fn rendering_is_deterministic() {
        let library = StyleLibrary::builtin();
        for name in library.names() {
            let style = library.get(name).unwrap();
            let rasterizer = BlockRasterizer::default();
            let renderer = make_renderer(style, &rasterizer);

            let a = renderer.render_at(30, 1.0, &chunks());
            let b = renderer.render_at(30, 1.0, &chunks());
            assert_eq!(
                a.image.as_raw(),
                b.image.as_raw(),
                "style {name} not deterministic"
            );
        }
    }

    #[test]
    fn empty_chunk_list_is_transparent_everywhere() {
        let library = StyleLibrary::builtin();
        let style = library.get("glow_caption").unwrap();
        let rasterizer = BlockRasterizer::default();
        let renderer = make_renderer(style, &rasterizer);

        for index in [0usize, 10, 100] {
            let frame = renderer.render_at(index, index as f64 / 30.0, &[]);
            assert!(frame.is_transparent());
        }
    }

    #[test]
    fn background_box_sits_behind_the_text() {
        let library = StyleLibrary::builtin();
        let style = library.get("boxed_caption").unwrap();
        let rasterizer = BlockRasterizer::default();
        let renderer = make_renderer(style, &rasterizer);

        let frame = renderer.render_at(30, 1.0, &chunks());
        // The box is wider than the text, so pixels left of the first
        // glyph are box-colored.
        let words = crate::style_engine::layout_words(
            &chunks()[0],
            1.0,
            style,
            &rasterizer,
            1080,
            1920,
        );
        let left = words[0].x as u32;
        let baseline = words[0].baseline as u32;
        let probe = frame.image.get_pixel(left - 10, baseline - 5).0;
        assert_eq!(probe[3], 255);
        assert_eq!(&probe[..3], &[16, 16, 16]);
    }

    #[test]
    fn glow_halo_surrounds_the_active_word() {
        let library = StyleLibrary::builtin();
        let style = library.get("glow_caption").unwrap();
        let rasterizer = BlockRasterizer::default();
        let renderer = make_renderer(style, &rasterizer);

        let frame = renderer.render_at(30, 1.0, &chunks());
        let words = crate::style_engine::layout_words(
            &chunks()[0],
            1.0,
            style,
            &rasterizer,
            1080,
            1920,
        );
        let active = words.iter().find(|w| w.active).unwrap();
        // Probe just above the active word's glyph box: only the blurred
        // halo reaches there.
        let x = (active.x + active.width / 2.0) as u32;
        let metrics = rasterizer.measure(&active.text, active.font_size);
        let y = (active.baseline - metrics.ascent) as u32 - 6;
        let alpha = frame.image.get_pixel(x, y).0[3];
        assert!(alpha > 0, "expected halo above the active word");
    }
}
