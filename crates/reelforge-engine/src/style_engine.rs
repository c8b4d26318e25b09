//! Word activation and caption layout for a single frame time.
//!
//! Everything here is a pure function of `(t, chunks, style)`: no
//! latches, no hysteresis, no frame-to-frame state. That makes the
//! mapping order-independent, so frames can render in any order or in
//! parallel and re-rendering one frame always matches the sequence.

use crate::render::glyphs::GlyphRasterizer;
use reelforge_models::{Color, StyleProfile, SubtitleChunk, VerticalAnchor};

/// Which chunk and token are live at a frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No chunk covers the frame time.
    Idle,
    /// `chunk` is on screen. `token` is the index of the word whose own
    /// span contains the time, or `None` during intra-chunk gaps and the
    /// minimum-duration tail.
    Active {
        chunk: usize,
        token: Option<usize>,
    },
}

/// Derived visual state for one displayed word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordVisualState {
    /// Display text after the style's case transform.
    pub text: String,
    /// Left edge of the word, in output pixels.
    pub x: f32,
    /// Baseline y-coordinate, in output pixels.
    pub baseline: f32,
    pub font_size: f32,
    pub color: Color,
    /// True for the word currently being spoken.
    pub active: bool,
    /// Measured advance width at `font_size`.
    pub width: f32,
}

/// Map a frame time to the chunk/token state.
pub fn frame_state(chunks: &[SubtitleChunk], t: f64) -> FrameState {
    match chunks.iter().position(|c| c.contains(t)) {
        Some(chunk) => {
            let token = chunks[chunk]
                .tokens
                .iter()
                .position(|w| w.start <= t && t < w.end);
            FrameState::Active { chunk, token }
        }
        None => FrameState::Idle,
    }
}

/// Select the token window shown around `anchor`.
///
/// The window clamps at the chunk edges instead of under-filling,
/// mirroring the crop calculator's boundary policy: near either end the
/// window shifts inward so it still shows `max_tokens` words whenever
/// the chunk has that many.
pub fn visible_range(token_count: usize, anchor: usize, max_tokens: usize) -> (usize, usize) {
    let max_tokens = max_tokens.max(1);
    let mut start = anchor.saturating_sub(max_tokens / 2);
    let end = (start + max_tokens).min(token_count);
    if end - start < max_tokens {
        start = end.saturating_sub(max_tokens);
    }
    (start, end)
}

/// Lay out the visible window of `chunk` at time `t`.
///
/// Words are measured at their frame-time size, joined with the
/// inactive-size space advance, centered within the narrower of
/// `layout.max_width` and the canvas, and anchored vertically per the
/// style. A line that would overflow the usable width is scaled down
/// uniformly; words are never wrapped or dropped.
pub fn layout_words(
    chunk: &SubtitleChunk,
    t: f64,
    style: &StyleProfile,
    rasterizer: &dyn GlyphRasterizer,
    canvas_width: u32,
    canvas_height: u32,
) -> Vec<WordVisualState> {
    if chunk.tokens.is_empty() {
        return Vec::new();
    }

    let active = chunk
        .tokens
        .iter()
        .position(|w| w.start <= t && t < w.end);
    // During gaps and the extended tail, anchor on the most recent word
    // so the caption stays put instead of jumping back.
    let anchor = active.unwrap_or_else(|| {
        chunk
            .tokens
            .iter()
            .rposition(|w| w.start <= t)
            .unwrap_or(0)
    });
    let (first, last) = visible_range(
        chunk.tokens.len(),
        anchor,
        style.animation.max_tokens_per_frame,
    );

    let typography = &style.typography;
    let mut words: Vec<WordVisualState> = (first..last)
        .map(|idx| {
            let token = &chunk.tokens[idx];
            let is_active = active == Some(idx);
            let font_size = if is_active {
                activation_size(style, t - token.start)
            } else {
                typography.font_size_inactive
            };
            let color = if is_active {
                typography.color_active
            } else {
                typography.color_inactive
            };
            WordVisualState {
                text: typography.text_transform.apply(&token.display_text),
                x: 0.0,
                baseline: 0.0,
                font_size,
                color,
                active: is_active,
                width: 0.0,
            }
        })
        .collect();

    measure_words(&mut words, rasterizer);
    let space = rasterizer
        .measure(" ", typography.font_size_inactive)
        .width;
    let mut total = line_width(&words, space);

    // Uniform shrink when the window would overflow the usable width.
    let usable = style.layout.max_width.min(canvas_width) as f32;
    if total > usable && total > 0.0 {
        let scale = usable / total;
        for word in &mut words {
            word.font_size *= scale;
        }
        measure_words(&mut words, rasterizer);
        total = line_width(&words, space * scale);
    }

    // Vertical placement from the extents of the laid-out line.
    let mut ascent = 0.0f32;
    let mut descent = 0.0f32;
    for word in &words {
        let metrics = rasterizer.measure(&word.text, word.font_size);
        ascent = ascent.max(metrics.ascent);
        descent = descent.max(metrics.descent);
    }
    let margin = style.layout.safe_zone_margin as f32;
    let baseline = match style.layout.position {
        VerticalAnchor::Top => margin + ascent,
        VerticalAnchor::Middle => (canvas_height as f32 - ascent - descent) / 2.0 + ascent,
        VerticalAnchor::Bottom => canvas_height as f32 - margin - descent,
    };

    let mut x = (canvas_width as f32 - total) / 2.0;
    let space = if words.len() > 1 {
        (total - words.iter().map(|w| w.width).sum::<f32>()) / (words.len() - 1) as f32
    } else {
        0.0
    };
    for word in &mut words {
        word.x = x;
        word.baseline = baseline;
        x += word.width + space;
    }

    words
}

/// Active font size eased over the style's transition duration.
///
/// Linear ramp from the inactive to the active size; a zero duration
/// snaps immediately.
fn activation_size(style: &StyleProfile, since_start: f64) -> f32 {
    let inactive = style.typography.font_size_inactive;
    let active = style.typography.font_size_active;
    let duration = style.animation.transition_duration;
    if duration <= 0.0 {
        return active;
    }
    let progress = (since_start / duration).clamp(0.0, 1.0) as f32;
    inactive + (active - inactive) * progress
}

fn measure_words(words: &mut [WordVisualState], rasterizer: &dyn GlyphRasterizer) {
    for word in words {
        word.width = rasterizer.measure(&word.text, word.font_size).width;
    }
}

fn line_width(words: &[WordVisualState], space: f32) -> f32 {
    let text: f32 = words.iter().map(|w| w.width).sum();
    if words.is_empty() {
        0.0
    } else {
        text + space * (words.len() - 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockRasterizer;
    use reelforge_models::{StyleLibrary, WordToken};

    fn chunk() -> SubtitleChunk {
        SubtitleChunk {
            tokens: vec![
                WordToken::new("one", 0.4, 1.0),
                WordToken::new("two", 1.0, 1.4),
                WordToken::new("three", 1.6, 2.2),
                WordToken::new("four", 3.0, 3.6),
                WordToken::new("five", 5.4, 6.2),
            ],
            start: 0.4,
            end: 6.2,
        }
    }

    fn style() -> reelforge_models::StyleProfile {
        StyleLibrary::builtin().get("clean_caption").unwrap().clone()
    }

    #[test]
    fn idle_before_first_chunk() {
        assert_eq!(frame_state(&[chunk()], 0.0), FrameState::Idle);
        assert_eq!(frame_state(&[chunk()], 6.2), FrameState::Idle);
    }

    #[test]
    fn active_chunk_and_token_resolve_from_time() {
        assert_eq!(
            frame_state(&[chunk()], 1.0),
            FrameState::Active {
                chunk: 0,
                token: Some(1)
            }
        );
        // Gap between "three" and "four".
        assert_eq!(
            frame_state(&[chunk()], 2.5),
            FrameState::Active {
                chunk: 0,
                token: None
            }
        );
    }

    #[test]
    fn window_clamps_at_chunk_edges() {
        assert_eq!(visible_range(5, 0, 3), (0, 3));
        assert_eq!(visible_range(5, 2, 3), (1, 4));
        assert_eq!(visible_range(5, 4, 3), (2, 5));
        // Short chunks under-fill only when there is nothing left to show.
        assert_eq!(visible_range(2, 0, 3), (0, 2));
        assert_eq!(visible_range(4, 1, 1), (1, 2));
    }

    #[test]
    fn active_word_gets_active_size_and_color() {
        let style = style();
        let rasterizer = BlockRasterizer::default();
        let words = layout_words(&chunk(), 1.2, &style, &rasterizer, 1080, 1920);

        assert_eq!(words.len(), 3);
        let active: Vec<_> = words.iter().filter(|w| w.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "TWO");
        assert_eq!(active[0].color, style.typography.color_active);
        assert!(active[0].font_size > style.typography.font_size_inactive);
        for word in words.iter().filter(|w| !w.active) {
            assert_eq!(word.font_size, style.typography.font_size_inactive);
        }
    }

    #[test]
    fn transition_eases_monotonically_to_active_size() {
        let mut style = style();
        style.animation.transition_duration = 0.2;
        let rasterizer = BlockRasterizer::default();

        let size_at = |t: f64| {
            layout_words(&chunk(), t, &style, &rasterizer, 1080, 1920)
                .into_iter()
                .find(|w| w.active)
                .unwrap()
                .font_size
        };

        // "two" activates at t = 1.0.
        let early = size_at(1.0);
        let mid = size_at(1.1);
        let done = size_at(1.2);
        assert_eq!(early, style.typography.font_size_inactive);
        assert!(early < mid && mid < done);
        assert_eq!(done, style.typography.font_size_active);
    }

    #[test]
    fn line_is_centered_within_canvas() {
        let style = style();
        let rasterizer = BlockRasterizer::default();
        let words = layout_words(&chunk(), 2.5, &style, &rasterizer, 1080, 1920);

        let left = words.first().unwrap().x;
        let right = words.last().unwrap().x + words.last().unwrap().width;
        let center = (left + right) / 2.0;
        assert!((center - 540.0).abs() < 1.0, "line center {center}");
    }

    #[test]
    fn bottom_anchor_respects_safe_zone_margin() {
        let style = style();
        let rasterizer = BlockRasterizer::default();
        let words = layout_words(&chunk(), 0.5, &style, &rasterizer, 1080, 1920);

        // Block glyphs sit on the baseline, so the line bottom is the
        // baseline itself.
        let expected = 1920.0 - style.layout.safe_zone_margin as f32;
        assert_eq!(words[0].baseline, expected);
    }

    #[test]
    fn overflowing_line_is_scaled_down_to_fit() {
        let mut style = style();
        style.layout.max_width = 200;
        let rasterizer = BlockRasterizer::default();
        let words = layout_words(&chunk(), 1.8, &style, &rasterizer, 1080, 1920);

        let left = words.first().unwrap().x;
        let right = words.last().unwrap().x + words.last().unwrap().width;
        // Block glyph advances quantize to whole pixels, so the rescaled
        // line can overshoot the target width by a few pixels per word.
        assert!(right - left <= 240.0, "line width {}", right - left);
        for word in &words {
            assert!(word.font_size < style.typography.font_size_inactive);
        }
    }

    #[test]
    fn caption_holds_during_gaps_anchored_on_last_word() {
        let style = style();
        let rasterizer = BlockRasterizer::default();
        // Gap after "three" (index 2): window centered there.
        let words = layout_words(&chunk(), 2.5, &style, &rasterizer, 1080, 1920);
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["TWO", "THREE", "FOUR"]);
        assert!(words.iter().all(|w| !w.active));
    }
}
