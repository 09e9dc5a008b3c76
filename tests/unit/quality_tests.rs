/*!
 * Tests for the quality evaluator.
 *
 * Covers the properties every metric must hold:
 * - identical texts score 1.0
 * - empty input scores 0.0
 * - results stay in [0, 1] and are deterministic
 */

use altrans::translation::quality::{Evaluator, TranslationMetrics, bleu, meteor, rouge};

const SAMPLES: [&str; 6] = [
    "hello",
    "Good morning!",
    "the cat sat on the mat",
    "A B C D E F G",
    "It's a long way to the top, if you want to rock and roll.",
    "おはようございます",
];

#[test]
fn test_bleuAndRouge_identicalText_shouldBeOne() {
    for sample in SAMPLES {
        assert_eq!(bleu(sample, sample), 1.0, "bleu for {:?}", sample);
        assert_eq!(rouge(sample, sample), 1.0, "rouge for {:?}", sample);
        assert_eq!(meteor(sample, sample), 1.0, "meteor for {:?}", sample);
    }
}

#[test]
fn test_bleu_emptyHypothesis_shouldBeZero() {
    for sample in SAMPLES {
        assert_eq!(bleu("", sample), 0.0);
    }
    assert_eq!(bleu("", ""), 0.0);
    assert_eq!(bleu("...", "hello"), 0.0);
}

#[test]
fn test_metrics_shouldStayWithinBounds() {
    for hypothesis in SAMPLES {
        for reference in SAMPLES {
            let metrics = Evaluator::new().score(hypothesis, reference);
            assert!(metrics.is_within_bounds(), "{:?} vs {:?}: {:?}", hypothesis, reference, metrics);
        }
    }
}

#[test]
fn test_metrics_shouldBeDeterministic() {
    let evaluator = Evaluator::new();
    let first = evaluator.score("the quick brown fox jumps", "a quick brown dog jumps high");
    let second = evaluator.score("the quick brown fox jumps", "a quick brown dog jumps high");
    assert_eq!(first, second);
}

#[test]
fn test_metrics_closerHypothesis_shouldScoreHigher() {
    let reference = "the quick brown fox jumps over the lazy dog";
    let close = Evaluator::new().score("the quick brown fox jumps over a lazy dog", reference);
    let far = Evaluator::new().score("a slow green turtle crawls", reference);

    assert!(close.bleu > far.bleu);
    assert!(close.rouge > far.rouge);
    assert!(close.meteor > far.meteor);
    assert!(close.quality() > far.quality());
}

#[test]
fn test_rouge_blankReference_shouldBeZero() {
    assert_eq!(rouge("some words", "   "), 0.0);
}

#[test]
fn test_evaluate_withoutReference_shouldCompareAgainstSource() {
    let evaluator = Evaluator::new();

    let unrelated = evaluator.evaluate("Good morning", "おはようございます", None);
    assert_eq!(unrelated, TranslationMetrics::zero());

    let referenced = evaluator.evaluate("Good morning", "おはようございます", Some("おはようございます"));
    assert_eq!(referenced, TranslationMetrics::perfect());
}

#[test]
fn test_percentages_fallbackTriple_shouldMatchDisplayValues() {
    let pct = TranslationMetrics::new(0.45, 0.52, 0.38).percentages();
    assert_eq!((pct.bleu, pct.rouge, pct.meteor, pct.quality), (45.0, 52.0, 38.0, 45.0));
}
