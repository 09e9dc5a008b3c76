/*!
 * Dictionary-based fallback translation.
 *
 * Used whenever no neural backend can serve a request. Tries, in order:
 * 1. an exact match of the whole input against the reference examples
 * 2. the most similar example sentence (word-set Jaccard above 0.7)
 * 3. greedy longest-phrase matching per sentence, passing unknown words
 *    through
 *
 * Every result carries a heuristic confidence in [0.2, 0.98].
 */

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::language_utils::{ResourceTier, language_stats, localized_placeholder};

use super::reference::ReferenceExamples;

/// Confidence for an exact whole-input dictionary hit
pub const EXACT_MATCH_CONFIDENCE: f64 = 0.98;

/// Minimum Jaccard similarity for the similar-example path
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Confidence range the similar-example path maps onto
const SIMILAR_CONFIDENCE_RANGE: (f64, f64) = (0.8, 0.95);

/// Clamp range for the phrase-matching path
const PHRASE_CONFIDENCE_RANGE: (f64, f64) = (0.3, 0.95);

/// Confidence when a stock example stands in for empty output
pub const EXAMPLE_SUBSTITUTE_CONFIDENCE: f64 = 0.3;

/// Confidence of the generic placeholder phrase
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.2;

/// Longest phrase, in words, tried by the greedy matcher
pub const MAX_PHRASE_WORDS: usize = 5;

/// Input length at which the length factor bottoms out
const COMPLEXITY_CHAR_LIMIT: f64 = 500.0;

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？'];

static SENTENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?。！？]+[.!?。！？]*|[.!?。！？]+").expect("valid sentence pattern"));

/// How a fallback translation was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMethod {
    /// Whole input matched a reference example
    ExactMatch,
    /// Input was close enough to a reference example
    SimilarExample,
    /// Greedy phrase-by-phrase dictionary translation
    PhraseMatch,
    /// Nothing was produced; a stock example was substituted
    ExampleSubstitute,
    /// Nothing was produced and no example exists
    Placeholder,
}

/// Output of the fallback translator
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTranslation {
    /// Translated text
    pub text: String,
    /// Heuristic confidence (0.2 - 0.98)
    pub confidence: f64,
    /// Path that produced the text
    pub method: FallbackMethod,
}

impl FallbackTranslation {
    fn new(text: impl Into<String>, confidence: f64, method: FallbackMethod) -> Self {
        Self {
            text: text.into(),
            confidence,
            method,
        }
    }
}

/// Dictionary-and-longest-match translator
#[derive(Debug, Clone)]
pub struct PhraseFallbackTranslator {
    examples: Arc<ReferenceExamples>,
}

impl Default for PhraseFallbackTranslator {
    fn default() -> Self {
        Self::new(ReferenceExamples::builtin())
    }
}

impl PhraseFallbackTranslator {
    /// Create a translator over the given reference examples
    pub fn new(examples: Arc<ReferenceExamples>) -> Self {
        Self { examples }
    }

    /// Reference examples backing this translator
    pub fn examples(&self) -> &ReferenceExamples {
        &self.examples
    }

    /// Translate `text` into `target_language` using only static data
    pub fn translate(&self, text: &str, target_language: &str) -> FallbackTranslation {
        let trimmed = text.trim();

        if !trimmed.is_empty() {
            if let Some(target) = self.examples.lookup(target_language, trimmed) {
                return FallbackTranslation::new(target, EXACT_MATCH_CONFIDENCE, FallbackMethod::ExactMatch);
            }

            if let Some(similar) = self.similar_example(trimmed, target_language) {
                return similar;
            }

            if let Some(phrased) = self.phrase_match(trimmed, target_language) {
                return phrased;
            }
        }

        self.empty_output(target_language)
    }

    fn similar_example(&self, text: &str, target_language: &str) -> Option<FallbackTranslation> {
        let input_words = word_set(text);
        if input_words.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &str)> = None;
        for example in self.examples.examples_for(target_language) {
            let similarity = jaccard_similarity(&input_words, &word_set(&example.source));
            if best.is_none_or(|(best_similarity, _)| similarity > best_similarity) {
                best = Some((similarity, example.target.as_str()));
            }
        }

        let (similarity, target) = best?;
        if similarity <= SIMILARITY_THRESHOLD {
            return None;
        }

        debug!("Fallback matched a similar example (similarity {:.2})", similarity);
        let (low, high) = SIMILAR_CONFIDENCE_RANGE;
        let span = (similarity - SIMILARITY_THRESHOLD) / (1.0 - SIMILARITY_THRESHOLD);
        let confidence = low + span * (high - low);
        Some(FallbackTranslation::new(target, confidence, FallbackMethod::SimilarExample))
    }

    fn phrase_match(&self, text: &str, target_language: &str) -> Option<FallbackTranslation> {
        let mut sentences = Vec::new();
        let mut total_words = 0;
        let mut matched_words = 0;

        for sentence in SENTENCE_PATTERN.find_iter(text) {
            let words: Vec<&str> = sentence.as_str().split_whitespace().collect();
            let mut pieces = Vec::with_capacity(words.len());
            let mut i = 0;

            while i < words.len() {
                let longest = MAX_PHRASE_WORDS.min(words.len() - i);
                let found = (1..=longest).rev().find_map(|len| {
                    let key = words[i..i + len]
                        .iter()
                        .map(|w| normalize_word(w))
                        .collect::<Vec<_>>()
                        .join(" ");
                    self.examples
                        .lookup(target_language, &key)
                        .map(|translation| (len, translation))
                });

                match found {
                    Some((len, translation)) => {
                        let (_, trailing) = split_trailing_punctuation(words[i + len - 1]);
                        pieces.push(format!("{}{}", translation, trailing));
                        matched_words += len;
                        i += len;
                    }
                    None => {
                        pieces.push(adapt_unknown_word(words[i], target_language));
                        i += 1;
                    }
                }
            }

            total_words += words.len();
            if !pieces.is_empty() {
                sentences.push(pieces.join(" "));
            }
        }

        if sentences.is_empty() || total_words == 0 {
            return None;
        }

        let output = apply_segmentation(&sentences.join(" "), target_language);
        if output.is_empty() {
            return None;
        }

        let matched_ratio = matched_words as f64 / total_words as f64;
        let confidence = (matched_ratio * length_complexity_factor(text) * data_availability_factor(target_language))
            .clamp(PHRASE_CONFIDENCE_RANGE.0, PHRASE_CONFIDENCE_RANGE.1);

        debug!(
            "Fallback phrase match: {}/{} words matched, confidence {:.2}",
            matched_words, total_words, confidence
        );
        Some(FallbackTranslation::new(output, confidence, FallbackMethod::PhraseMatch))
    }

    fn empty_output(&self, target_language: &str) -> FallbackTranslation {
        match self.examples.examples_for(target_language).first() {
            Some(example) => FallbackTranslation::new(
                example.target.clone(),
                EXAMPLE_SUBSTITUTE_CONFIDENCE,
                FallbackMethod::ExampleSubstitute,
            ),
            None => FallbackTranslation::new(
                localized_placeholder(target_language),
                PLACEHOLDER_CONFIDENCE,
                FallbackMethod::Placeholder,
            ),
        }
    }
}

/// Lowercase a word and strip surrounding ASCII punctuation
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase()
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Word-set Jaccard similarity
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn split_trailing_punctuation(word: &str) -> (&str, &str) {
    let core_end = word
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_punctuation())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    word.split_at(core_end)
}

/// Quote an untranslatable word for scripts written without spaces
pub fn adapt_unknown_word(word: &str, target_language: &str) -> String {
    match language_stats(target_language) {
        Some(stats) if !stats.uses_whitespace_segmentation => {
            let (core, trailing) = split_trailing_punctuation(word);
            if core.is_empty() {
                return word.to_string();
            }
            let (open, close) = stats.script.quote_marks();
            format!("{}{}{}{}", open, core, close, trailing)
        }
        _ => word.to_string(),
    }
}

/// 1.0 for empty input, falling linearly to 0.5 at 500+ characters
pub fn length_complexity_factor(text: &str) -> f64 {
    let chars = text.chars().count() as f64;
    1.0 - 0.5 * (chars / COMPLEXITY_CHAR_LIMIT).min(1.0)
}

/// Per-language data availability multiplier
pub fn data_availability_factor(target_language: &str) -> f64 {
    language_stats(target_language)
        .map(|s| s.tier)
        .unwrap_or(ResourceTier::Low)
        .availability_factor()
}

/// Strip inter-word spaces for languages written without them
///
/// A single space survives directly after sentence punctuation.
pub fn apply_segmentation(text: &str, target_language: &str) -> String {
    let uses_whitespace = language_stats(target_language)
        .map(|s| s.uses_whitespace_segmentation)
        .unwrap_or(true);
    if uses_whitespace {
        return text.trim().to_string();
    }

    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            let after_terminator = output.chars().last().is_some_and(|last| SENTENCE_TERMINATORS.contains(&last));
            if after_terminator {
                output.push(' ');
            }
        } else {
            output.push(c);
        }
    }
    output.trim().to_string()
}
