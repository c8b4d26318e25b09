//! Robust representative-position estimation over noisy detections.

use reelforge_models::{Point, PositionSample};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Filtering thresholds for position samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Samples below this confidence are discarded (default: 0.5)
    pub min_confidence: f64,

    /// Minimum surviving samples required to report a position (default: 1)
    pub min_samples: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            min_samples: 1,
        }
    }
}

/// Compute the coordinate-wise median of the confident samples.
///
/// The median rather than the mean keeps a momentary false positive far
/// from the subject from dragging the crop window: one bad sample can
/// shift the result by at most one rank position. Returns `None` when no
/// usable signal remains; the caller falls back to a center crop.
pub fn representative_position(
    samples: &[PositionSample],
    config: &SamplerConfig,
) -> Option<Point> {
    let mut xs = Vec::with_capacity(samples.len());
    let mut ys = Vec::with_capacity(samples.len());
    for sample in samples {
        if sample.confidence >= config.min_confidence {
            xs.push(sample.point.x);
            ys.push(sample.point.y);
        }
    }

    if xs.is_empty() || xs.len() < config.min_samples {
        info!(
            total = samples.len(),
            confident = xs.len(),
            "no usable position signal"
        );
        return None;
    }

    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);
    let point = Point::new(median_of_sorted(&xs), median_of_sorted(&ys));

    debug!(
        x = point.x,
        y = point.y,
        samples = xs.len(),
        "representative position"
    );
    Some(point)
}

/// Median of a sorted, non-empty slice; even lengths average the two
/// middle values.
fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
