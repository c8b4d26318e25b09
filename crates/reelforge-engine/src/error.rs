//! Error types for the clip transformation engine.

use reelforge_models::{StyleError, WindowError};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort processing of a single clip.
///
/// Degraded inputs (missing detections, empty transcripts) are absorbed
/// by the components that see them and never surface here; everything
/// below is either a configuration problem or a broken input contract.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("style configuration error: {0}")]
    Style(#[from] StyleError),

    #[error("font family not registered: {0}")]
    FontNotFound(String),

    #[error("font data could not be parsed: {0}")]
    InvalidFont(String),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("word token {index} has start {start} after end {end}")]
    InvalidTokenSpan { index: usize, start: f64, end: f64 },

    #[error("word tokens not sorted by start at index {index}")]
    UnsortedTokens { index: usize },
}
