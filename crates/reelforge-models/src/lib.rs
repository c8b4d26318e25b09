//! Shared data models for the ReelForge clip engine.
//!
//! This crate provides Serde-serializable types for:
//! - Geometry (points, aspect ratios, crop rectangles)
//! - Clip timelines (position samples, word tokens, subtitle chunks)
//! - Subtitle style profiles and the named style library

pub mod geometry;
pub mod style;
pub mod timeline;

// Re-export common types
pub use geometry::{AspectRatio, CropRect, Point};
pub use style::{
    Animation, Color, Effect, Layout, StyleError, StyleLibrary, StyleProfile, TextTransform,
    Typography, VerticalAnchor,
};
pub use timeline::{
    clip_words, parse_timestamp, ClipWindow, PositionSample, SubtitleChunk, TimestampError,
    WindowError, WordToken,
};
