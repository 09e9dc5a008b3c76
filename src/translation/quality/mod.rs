/*!
 * Quality evaluation for produced translations.
 *
 * - **Metrics**: the BLEU / ROUGE / METEOR triple and its aggregates
 * - **Scoring**: the pure scoring functions and the `Evaluator` facade
 *
 * The evaluator holds no mutable state and can be shared freely.
 */

pub mod metrics;
pub mod scoring;

// Re-export main types
pub use metrics::{MetricPercentages, TranslationMetrics};
pub use scoring::{Evaluator, bleu, meteor, rouge, tokenize};
