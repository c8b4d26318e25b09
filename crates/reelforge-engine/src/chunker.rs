//! Grouping word tokens into caption chunks.

use crate::error::{EngineError, EngineResult};
use reelforge_models::{SubtitleChunk, WordToken};
use serde::{Deserialize, Serialize};

/// Limits applied while grouping tokens into chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum concatenated character count per chunk, joining spaces
    /// included (default: 20)
    pub max_chars: usize,

    /// Maximum token count per chunk (default: 3)
    pub max_tokens: usize,

    /// Shortest time a chunk stays on screen, in seconds (default: 1.0)
    pub min_duration: f64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 20,
            max_tokens: 3,
            min_duration: 1.0,
        }
    }
}

/// Partition `tokens` into ordered, non-overlapping caption chunks.
///
/// Every token lands in exactly one chunk, in order. Tokens are
/// validated first: a reversed span or an unsorted stream would break
/// the partition invariant, so either rejects the whole clip. An empty
/// stream is valid and yields no chunks.
pub fn chunk_tokens(
    tokens: &[WordToken],
    clip_duration: f64,
    config: &ChunkerConfig,
) -> EngineResult<Vec<SubtitleChunk>> {
    validate_tokens(tokens)?;

    let max_tokens = config.max_tokens.max(1);
    let mut chunks: Vec<SubtitleChunk> = Vec::new();
    let mut current: Vec<WordToken> = Vec::new();
    let mut current_chars = 0usize;

    for token in tokens {
        let word_chars = token.display_text.chars().count();
        let appended_chars = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        // A single oversize token still forms its own chunk; tokens are
        // never split.
        let over_limit =
            !current.is_empty() && (appended_chars > config.max_chars || current.len() >= max_tokens);
        if over_limit {
            chunks.push(close_chunk(std::mem::take(&mut current)));
            current_chars = word_chars;
        } else {
            current_chars = appended_chars;
        }
        current.push(token.clone());
    }
    if !current.is_empty() {
        chunks.push(close_chunk(current));
    }

    enforce_min_duration(&mut chunks, clip_duration, config.min_duration);
    Ok(chunks)
}

/// Reject token streams the chunker cannot partition safely.
pub(crate) fn validate_tokens(tokens: &[WordToken]) -> EngineResult<()> {
    for (index, token) in tokens.iter().enumerate() {
        if token.start > token.end {
            return Err(EngineError::InvalidTokenSpan {
                index,
                start: token.start,
                end: token.end,
            });
        }
        if index > 0 && token.start < tokens[index - 1].start {
            return Err(EngineError::UnsortedTokens { index });
        }
    }
    Ok(())
}

fn close_chunk(tokens: Vec<WordToken>) -> SubtitleChunk {
    let start = tokens.first().map(|t| t.start).unwrap_or(0.0);
    let end = tokens.last().map(|t| t.end).unwrap_or(start);
    SubtitleChunk { tokens, start, end }
}

/// Extend short chunks forward to `min_duration`, never borrowing time
/// from the next chunk and never past the clip end.
fn enforce_min_duration(chunks: &mut [SubtitleChunk], clip_duration: f64, min_duration: f64) {
    for i in 0..chunks.len() {
        let limit = if i + 1 < chunks.len() {
            chunks[i + 1].start
        } else {
            clip_duration
        };

        let wanted = chunks[i].start + min_duration;
        if chunks[i].end < wanted {
            chunks[i].end = wanted.min(limit).max(chunks[i].end);
        }
        // Clamp to the clip window bound.
        chunks[i].end = chunks[i].end.min(clip_duration).max(chunks[i].start);
    }
}
