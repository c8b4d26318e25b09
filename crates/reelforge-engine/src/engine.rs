//! Per-clip transformation facade.
//!
//! One clip's transformation is a pure function of its inputs, so clips
//! run in parallel with no synchronization; within a clip, frame
//! rendering parallelizes once chunking has fixed the caption timeline.

use rayon::prelude::*;
use tracing::info;

use crate::chunker::{chunk_tokens, ChunkerConfig};
use crate::crop::CropCalculator;
use crate::error::EngineResult;
use crate::render::glyphs::FontLibrary;
use crate::render::{FrameRenderer, OverlayFrame};
use crate::sampler::{representative_position, SamplerConfig};
use reelforge_models::{AspectRatio, ClipWindow, CropRect, PositionSample, StyleLibrary, WordToken};

/// Everything needed to transform one clip.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    /// Source-video time range of the clip.
    pub window: ClipWindow,
    /// Subject positions sampled inside the window; may be empty.
    pub samples: Vec<PositionSample>,
    /// Clip-local word tokens, ordered by start; may be empty.
    pub tokens: Vec<WordToken>,
    /// Style name resolved against the style library.
    pub style: String,
    pub source_width: u32,
    pub source_height: u32,
}

/// Frame-rate and geometry settings shared by all clips of a job.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub aspect: AspectRatio,
    /// Overlay raster width (default: 1080)
    pub output_width: u32,
    /// Overlay raster height (default: 1920)
    pub output_height: u32,
    /// Overlay frames per second (default: 30)
    pub fps: u32,
    pub sampler: SamplerConfig,
    pub chunker: ChunkerConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            aspect: AspectRatio::PORTRAIT,
            output_width: 1080,
            output_height: 1920,
            fps: 30,
            sampler: SamplerConfig::default(),
            chunker: ChunkerConfig::default(),
        }
    }
}

/// The two outputs handed to the external compositor.
#[derive(Debug, Clone)]
pub struct ClipTransform {
    /// Source-frame region for the cut/crop/scale stage.
    pub crop: CropRect,
    /// Overlay sequence covering `[0, duration)` at the configured fps.
    pub frames: Vec<OverlayFrame>,
}

/// Transform one clip: crop rectangle plus the full overlay sequence.
///
/// Configuration problems (unknown style or font, broken token stream)
/// fail before the first frame is rendered. Degraded inputs degrade
/// silently: no usable detections fall back to a center crop, an empty
/// transcript yields an all-transparent overlay.
pub fn transform_clip(
    request: &ClipRequest,
    styles: &StyleLibrary,
    fonts: &FontLibrary,
    settings: &RenderSettings,
) -> EngineResult<ClipTransform> {
    let style = styles.get(&request.style)?;
    style.validate()?;
    let rasterizer = fonts.resolve(&style.typography.font_family)?;

    let duration = request.window.duration();
    let focus = representative_position(&request.samples, &settings.sampler);
    let crop = CropCalculator::new(request.source_width, request.source_height, settings.aspect)
        .compute(focus);

    let chunks = chunk_tokens(&request.tokens, duration, &settings.chunker)?;
    let total_frames = (duration * settings.fps as f64).ceil() as usize;
    info!(
        style = %request.style,
        chunks = chunks.len(),
        frames = total_frames,
        duration,
        "transforming clip"
    );

    let renderer = FrameRenderer::new(
        style,
        rasterizer,
        settings.output_width,
        settings.output_height,
    );
    let frames: Vec<OverlayFrame> = (0..total_frames)
        .into_par_iter()
        .map(|index| renderer.render_at(index, index as f64 / settings.fps as f64, &chunks))
        .collect();

    Ok(ClipTransform { crop, frames })
}

/// Transform many clips, isolating each clip's failure.
///
/// Results come back in request order; one clip's configuration error
/// never aborts its siblings.
pub fn transform_clips(
    requests: &[ClipRequest],
    styles: &StyleLibrary,
    fonts: &FontLibrary,
    settings: &RenderSettings,
) -> Vec<EngineResult<ClipTransform>> {
    requests
        .par_iter()
        .map(|request| transform_clip(request, styles, fonts, settings))
        .collect()
}
