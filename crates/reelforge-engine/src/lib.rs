//! Clip Transformation Engine.
//!
//! Turns a clip window, noisy subject-position samples, and timestamped
//! word tokens into (1) a deterministic, ratio-correct crop rectangle
//! and (2) a frame-indexed sequence of transparent subtitle overlay
//! rasters in a chosen visual style.
//!
//! # Architecture
//!
//! ```text
//! position samples ──► sampler ──► crop calculator ─────────► CropRect
//!
//! word tokens ──► chunker ──► style engine ──► frame renderer ─► overlay frames
//! ```
//!
//! The two paths are independent; `engine::transform_clip` runs both and
//! hands the results to the external cut/composite stages. All state is
//! read-only during a clip's processing, so clips and frames parallelize
//! freely.

pub mod chunker;
pub mod crop;
pub mod engine;
pub mod error;
pub mod render;
pub mod sampler;
pub mod style_engine;

#[cfg(test)]
pub(crate) mod testing;

pub use chunker::{chunk_tokens, ChunkerConfig};
pub use crop::CropCalculator;
pub use engine::{transform_clip, transform_clips, ClipRequest, ClipTransform, RenderSettings};
pub use error::{EngineError, EngineResult};
pub use render::glyphs::{
    FontLibrary, FontdueRasterizer, GlyphBitmap, GlyphRasterizer, TextMetrics,
};
pub use render::{FrameRenderer, OverlayFrame};
pub use sampler::{representative_position, SamplerConfig};
pub use style_engine::{frame_state, layout_words, visible_range, FrameState, WordVisualState};
