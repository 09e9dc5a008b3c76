/*!
 * Text-similarity scoring of a hypothesis against a reference.
 *
 * All three metrics share one tokenizer (lowercase, ASCII punctuation
 * stripped, whitespace split) and are pure functions of their inputs.
 * A metric that fails internally scores 0.0 without affecting the others.
 */

use std::collections::HashMap;

use log::error;

use crate::errors::ScoringError;

use super::metrics::TranslationMetrics;

/// Highest n-gram order used by BLEU
const MAX_NGRAM_ORDER: usize = 4;

/// Numerator substituted for an n-gram order with no matches
const SMOOTHING_EPSILON: f64 = 0.1;

/// Split text into lowercase word tokens with punctuation removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Size of the multiset intersection of two n-gram count tables
fn clipped_overlap<'a>(hypothesis: &HashMap<&'a [String], usize>, reference: &HashMap<&'a [String], usize>) -> usize {
    hypothesis
        .iter()
        .map(|(gram, count)| (*count).min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn f_measure(overlap: usize, hypothesis_total: usize, reference_total: usize) -> f64 {
    if overlap == 0 || hypothesis_total == 0 || reference_total == 0 {
        return 0.0;
    }
    let precision = overlap as f64 / hypothesis_total as f64;
    let recall = overlap as f64 / reference_total as f64;
    2.0 * precision * recall / (precision + recall)
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            curr_row[j + 1] = if token_a == token_b {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

fn checked(metric: &'static str, value: f64) -> Result<f64, ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::NonFinite { metric });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ScoringError::OutOfRange { metric, value });
    }
    Ok(value)
}

/// BLEU with method-1 smoothing and a brevity penalty.
///
/// Orders longer than the hypothesis are left out of the geometric mean, so
/// identical short texts still score 1.0.
pub fn try_bleu(hypothesis: &str, reference: &str) -> Result<f64, ScoringError> {
    let hyp = tokenize(hypothesis);
    let refr = tokenize(reference);
    if hyp.is_empty() || refr.is_empty() {
        return Ok(0.0);
    }

    let max_order = MAX_NGRAM_ORDER.min(hyp.len());
    let mut log_precision_sum = 0.0;

    for n in 1..=max_order {
        let hyp_counts = ngram_counts(&hyp, n);
        let ref_counts = ngram_counts(&refr, n);
        let total = hyp.len() - n + 1;
        let matched = clipped_overlap(&hyp_counts, &ref_counts);

        if n == 1 && matched == 0 {
            return Ok(0.0);
        }

        let precision = if matched == 0 {
            SMOOTHING_EPSILON / total as f64
        } else {
            matched as f64 / total as f64
        };
        log_precision_sum += precision.ln();
    }

    let geometric_mean = (log_precision_sum / max_order as f64).exp();
    let brevity_penalty = if hyp.len() > refr.len() {
        1.0
    } else {
        (1.0 - refr.len() as f64 / hyp.len() as f64).exp()
    };

    checked("bleu", brevity_penalty * geometric_mean)
}

/// Mean of the ROUGE-1, ROUGE-2 and ROUGE-L F-measures.
///
/// ROUGE-2 is skipped when neither side has a bigram.
pub fn try_rouge(hypothesis: &str, reference: &str) -> Result<f64, ScoringError> {
    if hypothesis.trim().is_empty() || reference.trim().is_empty() {
        return Ok(0.0);
    }
    let hyp = tokenize(hypothesis);
    let refr = tokenize(reference);
    if hyp.is_empty() || refr.is_empty() {
        return Ok(0.0);
    }

    let mut scores = Vec::with_capacity(3);

    let unigram_overlap = clipped_overlap(&ngram_counts(&hyp, 1), &ngram_counts(&refr, 1));
    scores.push(f_measure(unigram_overlap, hyp.len(), refr.len()));

    let hyp_bigrams = hyp.len().saturating_sub(1);
    let ref_bigrams = refr.len().saturating_sub(1);
    if hyp_bigrams > 0 || ref_bigrams > 0 {
        let bigram_overlap = clipped_overlap(&ngram_counts(&hyp, 2), &ngram_counts(&refr, 2));
        scores.push(f_measure(bigram_overlap, hyp_bigrams, ref_bigrams));
    }

    scores.push(f_measure(lcs_length(&hyp, &refr), hyp.len(), refr.len()));

    checked("rouge", scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Harmonic mean of token-overlap precision and recall.
pub fn try_meteor(hypothesis: &str, reference: &str) -> Result<f64, ScoringError> {
    let hyp = tokenize(hypothesis);
    let refr = tokenize(reference);
    if hyp.is_empty() || refr.is_empty() {
        return Ok(0.0);
    }

    let matches = clipped_overlap(&ngram_counts(&hyp, 1), &ngram_counts(&refr, 1));
    checked("meteor", f_measure(matches, hyp.len(), refr.len()))
}

fn or_zero(metric: &str, result: Result<f64, ScoringError>) -> f64 {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("Error calculating {} score: {}", metric, e);
            0.0
        }
    }
}

/// BLEU score, 0.0 on internal failure
pub fn bleu(hypothesis: &str, reference: &str) -> f64 {
    or_zero("BLEU", try_bleu(hypothesis, reference))
}

/// ROUGE score, 0.0 on internal failure
pub fn rouge(hypothesis: &str, reference: &str) -> f64 {
    or_zero("ROUGE", try_rouge(hypothesis, reference))
}

/// METEOR approximation, 0.0 on internal failure
pub fn meteor(hypothesis: &str, reference: &str) -> f64 {
    or_zero("METEOR", try_meteor(hypothesis, reference))
}

/// Scores translations with all three metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Score a translation against a reference.
    ///
    /// When no reference is available the source text stands in for it. That
    /// is an approximation, not a real reference, and scores accordingly low
    /// for most language pairs.
    pub fn evaluate(&self, source_text: &str, translated_text: &str, reference_text: Option<&str>) -> TranslationMetrics {
        let reference = reference_text.unwrap_or(source_text);
        self.score(translated_text, reference)
    }

    /// Score a hypothesis against an explicit reference.
    pub fn score(&self, hypothesis: &str, reference: &str) -> TranslationMetrics {
        TranslationMetrics::new(
            bleu(hypothesis, reference),
            rouge(hypothesis, reference),
            meteor(hypothesis, reference),
        )
    }
}
