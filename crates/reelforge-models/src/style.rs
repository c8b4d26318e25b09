//! Subtitle style profiles and the named style library.
//!
//! A profile is immutable configuration: layout, typography, exactly one
//! effect variant, and animation parameters. Profiles are validated in
//! full at load time so that a bad style fails the clip before the first
//! frame is rendered instead of corrupting every frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// RGB color, serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    /// Expand to RGBA with the given alpha.
    #[inline]
    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        let Color([r, g, b]) = self;
        [r, g, b, alpha]
    }
}

/// Vertical anchor for the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Case transform applied to display text before measuring and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
}

impl TextTransform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
        }
    }
}

/// Caption block placement within the output frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Layout {
    /// Vertical anchor edge for the caption block.
    pub position: VerticalAnchor,
    /// Offset from the anchored edge, in pixels. Keeps text clear of
    /// platform UI chrome on vertical-video surfaces.
    pub safe_zone_margin: u32,
    /// Maximum rendered line width, in pixels.
    pub max_width: u32,
}

/// Font and color parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Typography {
    /// Font family name, resolved against the injected font library.
    pub font_family: String,
    /// Size of words that are on screen but not being spoken.
    pub font_size_inactive: f32,
    /// Size of the word currently being spoken.
    pub font_size_active: f32,
    pub color_inactive: Color,
    pub color_active: Color,
    #[serde(default)]
    pub text_transform: TextTransform,
}

/// Visual treatment around the glyph fill. Exactly one per style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Uniform border drawn by a ring of offset glyph passes.
    Outline { width: u32, color: Color },
    /// Blurred halo beneath the sharp text, brighter on the active word.
    Glow {
        outline_width: u32,
        outline_color: Color,
        color_active: Color,
        color_inactive: Color,
        radius: f32,
    },
    /// Padded rounded rectangle behind the measured text bounds.
    Background {
        color: Color,
        padding: u32,
        corner_radius: u32,
    },
}

/// Word window and transition timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Animation {
    /// Maximum simultaneously displayed tokens, at least 1.
    pub max_tokens_per_frame: usize,
    /// Seconds over which a newly active word eases to its active size.
    #[serde(default)]
    pub transition_duration: f64,
}

/// A complete named subtitle style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleProfile {
    pub layout: Layout,
    pub typography: Typography,
    pub effect: Effect,
    pub animation: Animation,
}

impl StyleProfile {
    /// Check every field range.
    ///
    /// Runs at library load, so a partially valid profile never reaches
    /// the renderer.
    pub fn validate(&self) -> Result<(), StyleError> {
        let invalid = |field: &'static str, reason: &str| StyleError::InvalidField {
            field,
            reason: reason.to_string(),
        };

        if self.layout.max_width == 0 {
            return Err(invalid("layout.max_width", "must be positive"));
        }
        if self.typography.font_family.is_empty() {
            return Err(invalid("typography.font_family", "must not be empty"));
        }
        if !(self.typography.font_size_inactive > 0.0) {
            return Err(invalid("typography.font_size_inactive", "must be positive"));
        }
        if !(self.typography.font_size_active > 0.0) {
            return Err(invalid("typography.font_size_active", "must be positive"));
        }
        if self.animation.max_tokens_per_frame < 1 {
            return Err(invalid("animation.max_tokens_per_frame", "must be >= 1"));
        }
        if !(self.animation.transition_duration >= 0.0) {
            return Err(invalid("animation.transition_duration", "must be >= 0"));
        }
        match &self.effect {
            Effect::Outline { width, .. } => {
                if *width == 0 {
                    return Err(invalid("effect.width", "must be positive"));
                }
            }
            Effect::Glow { radius, .. } => {
                if !(*radius > 0.0) {
                    return Err(invalid("effect.radius", "must be positive"));
                }
            }
            Effect::Background { .. } => {}
        }
        Ok(())
    }
}

/// Errors raised while loading or validating style profiles.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("unknown style: {0}")]
    UnknownStyle(String),

    #[error("invalid style field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("style configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Named collection of validated style profiles.
#[derive(Debug, Clone, Default)]
pub struct StyleLibrary {
    styles: BTreeMap<String, StyleProfile>,
}

impl StyleLibrary {
    /// Load a `name -> profile` mapping from JSON, validating every entry.
    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        let styles: BTreeMap<String, StyleProfile> = serde_json::from_str(json)?;
        for profile in styles.values() {
            profile.validate()?;
        }
        Ok(Self { styles })
    }

    /// The styles bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(include_str!("../assets/styles.json"))
            .expect("bundled styles.json must be valid")
    }

    /// Look up a profile; unknown names are a configuration error.
    pub fn get(&self, name: &str) -> Result<&StyleProfile, StyleError> {
        self.styles
            .get(name)
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))
    }

    /// Add a profile, validating it first.
    pub fn insert(&mut self, name: impl Into<String>, profile: StyleProfile) -> Result<(), StyleError> {
        profile.validate()?;
        self.styles.insert(name.into(), profile);
        Ok(())
    }

    /// Available style names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.styles.keys().map(|k| k.as_str()).collect()
    }
}
