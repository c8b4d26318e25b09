//! Clip timeline types: position samples, clip windows, word tokens and
//! the caption chunks built from them.

use crate::geometry::Point;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single subject-position detection for one sampled source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionSample {
    /// Source-video time of the sampled frame, in seconds.
    pub timestamp: f64,
    /// Detected subject position in source-frame pixels.
    pub point: Point,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

impl PositionSample {
    pub fn new(timestamp: f64, point: Point, confidence: f64) -> Self {
        Self {
            timestamp,
            point,
            confidence,
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid timestamp: {0}")]
pub struct TimestampError(pub String);

/// Errors raised when constructing a [`ClipWindow`].
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("clip window start {start} must precede end {end}")]
    Order { start: f64, end: f64 },

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS` (optionally fractional) to seconds.
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let invalid = || TimestampError(ts.to_string());
    let parts: Vec<&str> = ts.split(':').collect();
    let parsed: Result<Vec<f64>, _> = parts.iter().map(|p| p.parse::<f64>()).collect();
    let parsed = parsed.map_err(|_| invalid())?;

    match parsed.as_slice() {
        [s] => Ok(*s),
        [m, s] => Ok(m * 60.0 + s),
        [h, m, s] => Ok(h * 3600.0 + m * 60.0 + s),
        _ => Err(invalid()),
    }
}

/// A contiguous source-time range selected for one output clip.
///
/// The constructor enforces `start < end`; a violated ordering rejects
/// the clip before any processing starts. Deserialization goes through
/// the same check, so a window loaded from JSON cannot be reversed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "WindowBounds")]
pub struct ClipWindow {
    start: f64,
    end: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
struct WindowBounds {
    start: f64,
    end: f64,
}

impl TryFrom<WindowBounds> for ClipWindow {
    type Error = WindowError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        ClipWindow::new(bounds.start, bounds.end)
    }
}

impl ClipWindow {
    pub fn new(start: f64, end: f64) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::Order { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a window from `HH:MM:SS`-style timestamps.
    pub fn from_timestamps(start: &str, end: &str) -> Result<Self, WindowError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Window start in source-video seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Window end in source-video seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Window length in seconds, always positive.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One transcribed word with clip-local timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordToken {
    /// Original transcript text.
    pub text: String,
    /// Text to draw on screen, possibly transliterated.
    pub display_text: String,
    /// Word start in clip-local seconds.
    pub start: f64,
    /// Word end in clip-local seconds.
    pub end: f64,
}

impl WordToken {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        let text = text.into();
        Self {
            display_text: text.clone(),
            text,
            start,
            end,
        }
    }

    /// Token whose on-screen text differs from the transcript text.
    pub fn with_display(
        text: impl Into<String>,
        display_text: impl Into<String>,
        start: f64,
        end: f64,
    ) -> Self {
        Self {
            text: text.into(),
            display_text: display_text.into(),
            start,
            end,
        }
    }
}

/// A group of consecutive tokens displayed together as one caption unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleChunk {
    /// Tokens in transcript order, never empty.
    pub tokens: Vec<WordToken>,
    /// First token start, in clip-local seconds.
    pub start: f64,
    /// Last token end, possibly extended to the minimum display duration.
    pub end: f64,
}

impl SubtitleChunk {
    /// True when `t` falls inside the chunk's display interval.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Concatenated display text, space separated.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|w| w.display_text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Select the words overlapping `window` and shift them to clip-local time.
///
/// Word spans are clamped to `[0, duration]`, so a word straddling either
/// window edge keeps only its in-window portion.
pub fn clip_words(words: &[WordToken], window: &ClipWindow) -> Vec<WordToken> {
    let duration = window.duration();
    words
        .iter()
        .filter(|w| w.end > window.start() && w.start < window.end())
        .map(|w| WordToken {
            text: w.text.clone(),
            display_text: w.display_text.clone(),
            start: (w.start - window.start()).max(0.0),
            end: (w.end - window.start()).min(duration),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_formats() {
        assert_eq!(parse_timestamp("90").unwrap(), 90.0);
        assert_eq!(parse_timestamp("1:30").unwrap(), 90.0);
        assert_eq!(parse_timestamp("01:02:03").unwrap(), 3723.0);
        assert!((parse_timestamp("00:00:01.5").unwrap() - 1.5).abs() < 1e-9);
        assert!(parse_timestamp("abc").is_err());
        assert!(parse_timestamp("1:2:3:4").is_err());
    }

    #[test]
    fn window_rejects_reversed_range() {
        assert!(ClipWindow::new(5.0, 5.0).is_err());
        assert!(ClipWindow::new(6.0, 5.0).is_err());
        let w = ClipWindow::from_timestamps("00:01:00", "00:01:30").unwrap();
        assert_eq!(w.start(), 60.0);
        assert_eq!(w.duration(), 30.0);
    }

    #[test]
    fn clip_words_shifts_and_clamps() {
        let words = vec![
            WordToken::new("before", 8.0, 9.5),
            WordToken::new("straddle", 9.5, 10.5),
            WordToken::new("inside", 11.0, 12.0),
            WordToken::new("tail", 19.5, 21.0),
            WordToken::new("after", 21.0, 22.0),
        ];
        let window = ClipWindow::new(10.0, 20.0).unwrap();

        let local = clip_words(&words, &window);
        assert_eq!(local.len(), 3);
        assert_eq!(local[0].text, "straddle");
        assert_eq!(local[0].start, 0.0);
        assert_eq!(local[0].end, 0.5);
        assert_eq!(local[1].start, 1.0);
        assert_eq!(local[1].end, 2.0);
        assert_eq!(local[2].text, "tail");
        assert_eq!(local[2].end, 10.0);
    }

    #[test]
    fn chunk_text_joins_display_words() {
        let chunk = SubtitleChunk {
            tokens: vec![
                WordToken::with_display("नमस्ते", "namaste", 0.0, 0.5),
                WordToken::new("friend", 0.5, 1.0),
            ],
            start: 0.0,
            end: 1.0,
        };
        assert_eq!(chunk.text(), "namaste friend");
        assert!(chunk.contains(0.0));
        assert!(!chunk.contains(1.0));
    }
}
