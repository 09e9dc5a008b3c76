/*!
 * Quality metric triple attached to every translation result.
 *
 * Each metric is a score in [0, 1]:
 * - BLEU: smoothed n-gram precision
 * - ROUGE: averaged overlap F-measures
 * - METEOR: token-overlap F1 approximation
 */

use serde::{Deserialize, Serialize};

/// Scores for a single translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslationMetrics {
    /// N-gram precision score (0.0 - 1.0)
    pub bleu: f64,
    /// Overlap F-measure score (0.0 - 1.0)
    pub rouge: f64,
    /// Token-overlap F1 score (0.0 - 1.0)
    pub meteor: f64,
}

impl TranslationMetrics {
    /// Create a metric triple, clamping each value into [0, 1].
    pub fn new(bleu: f64, rouge: f64, meteor: f64) -> Self {
        Self {
            bleu: clamp_unit(bleu),
            rouge: clamp_unit(rouge),
            meteor: clamp_unit(meteor),
        }
    }

    /// Maximal agreement on every metric.
    pub fn perfect() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// No agreement on any metric.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unweighted mean of the three metrics.
    pub fn quality(&self) -> f64 {
        (self.bleu + self.rouge + self.meteor) / 3.0
    }

    /// Each metric and the aggregate as a percentage with one decimal.
    pub fn percentages(&self) -> MetricPercentages {
        MetricPercentages {
            bleu: to_percentage(self.bleu),
            rouge: to_percentage(self.rouge),
            meteor: to_percentage(self.meteor),
            quality: to_percentage(self.quality()),
        }
    }

    /// Check that every metric lies in [0, 1].
    pub fn is_within_bounds(&self) -> bool {
        [self.bleu, self.rouge, self.meteor]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

/// Metrics rendered as percentages for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPercentages {
    pub bleu: f64,
    pub rouge: f64,
    pub meteor: f64,
    pub quality: f64,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn to_percentage(value: f64) -> f64 {
    (value * 1000.0).round() / 10.0
}
