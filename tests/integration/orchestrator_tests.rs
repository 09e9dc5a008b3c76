/*!
 * Dispatch, retry and fallback scenarios for the translation orchestrator
 */

use std::sync::Arc;

use altrans::backends::mock::{MockBackend, MockLoader};
use altrans::language_utils::SUPPORTED_LANGUAGES;
use altrans::translation::{
    FallbackMethod, ReferenceExamples, ResultSource, TranslationMetrics, TranslationOrchestrator, TranslationOutcome,
};

use crate::common::{ModelRoot, init_logging, long_text, orchestrator_with, test_config};

fn fallback_metrics() -> TranslationMetrics {
    TranslationMetrics::new(0.45, 0.52, 0.38)
}

#[tokio::test]
async fn test_translate_goodMorningJapanese_shouldUseReferenceWithPerfectScores() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("Good morning", "ja").await;

    assert_eq!(result.translated_text, "おはようございます");
    assert_eq!(result.source, ResultSource::Reference);
    assert_eq!(result.metrics, TranslationMetrics::perfect());
    assert_eq!(loader.backend().generation_count(), 0);
}

#[tokio::test]
async fn test_translate_helloWithoutBackend_shouldStillUseReference() {
    let root = ModelRoot::new().unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("  hello ", "ja").await;

    assert_eq!(result.translated_text, "こんにちは");
    assert_eq!(result.metrics, TranslationMetrics::perfect());
    assert_eq!(loader.instantiation_count(), 0);
}

#[tokio::test]
async fn test_translate_noBackendRegistered_shouldReturnFallbackTriple() {
    let root = ModelRoot::new().unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("The weather is lovely this afternoon", "ja").await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(result.metrics, fallback_metrics());
    assert!(!result.translated_text.is_empty());
    assert_eq!(loader.instantiation_count(), 0);
}

#[tokio::test]
async fn test_translate_longThaiWithoutBackend_shouldStripInterWordSpaces() {
    let root = ModelRoot::new().unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));
    let text = long_text(200);

    let result = orchestrator.translate(&text, "th").await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(result.metrics, fallback_metrics());
    assert!(!result.translated_text.is_empty());
    assert!(!result.translated_text.contains(' '), "{}", result.translated_text);
    assert!(result.translated_text.contains("สวัสดี"));
}

#[tokio::test]
async fn test_translateOutcome_longThai_shouldReportPhraseMatchConfidence() {
    let root = ModelRoot::new().unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));

    let outcome = orchestrator.translate_outcome(&long_text(200), "th").await;

    match outcome {
        TranslationOutcome::FallbackUsed { translation } => {
            assert_eq!(translation.method, FallbackMethod::PhraseMatch);
            assert!((0.3..=0.95).contains(&translation.confidence));
        }
        other => panic!("expected fallback, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_workingBackend_shouldScoreAgainstSource() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-hi").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("The market opens early", "hi").await;

    assert_eq!(result.source, ResultSource::Backend);
    assert_eq!(result.translated_text, "[hi_IN] The market opens early");
    assert!(result.metrics.is_within_bounds());
    assert!(result.metrics.meteor > 0.0);

    let request = &loader.backend().requests()[0];
    assert_eq!(request.params.num_beams, 5);
    assert_eq!(request.params.max_length, 64);
    assert!(request.params.do_sample);
}

#[tokio::test]
async fn test_translate_invalidThenValidShortInput_shouldRetryDeterministically() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let loader = MockLoader::new(MockBackend::invalid_then_valid());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("Open the window please", "ja").await;

    assert_eq!(result.source, ResultSource::Backend);
    assert_eq!(result.translated_text, "[ja_XX] Open the window please");

    let requests = loader.backend().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].params.num_beams, 3);
    assert_eq!(requests[1].params.max_length, 64);
    assert!(!requests[1].params.do_sample);
    assert!((requests[1].params.temperature - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_translate_echoingBackendShortInput_shouldRetryOnceThenFallback() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-zh").unwrap();
    let loader = MockLoader::new(MockBackend::echo());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("Where is the station", "zh").await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(result.metrics, fallback_metrics());
    assert_eq!(loader.backend().generation_count(), 2);
}

#[tokio::test]
async fn test_translate_emptyOutputLongInput_shouldSkipRetry() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-zh").unwrap();
    let loader = MockLoader::new(MockBackend::empty());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator
        .translate("We will meet again at the harbour tomorrow evening", "zh")
        .await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(loader.backend().generation_count(), 1);
}

#[tokio::test]
async fn test_translate_failingBackend_shouldReturnLocalizedError() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-th").unwrap();
    let loader = MockLoader::new(MockBackend::failing());
    let orchestrator = orchestrator_with(&root, &loader);

    let result = orchestrator.translate("The shop is closed today", "th").await;

    assert_eq!(result.source, ResultSource::Error);
    assert!(result.translated_text.starts_with("ข้อผิดพลาดในการแปล"), "{}", result.translated_text);
    assert_eq!(result.metrics, fallback_metrics());
}

#[tokio::test]
async fn test_translate_panickingBackend_shouldNotPropagatePanic() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-vi").unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::panicking()));

    let result = orchestrator.translate("The shop is closed today", "vi").await;

    assert_eq!(result.source, ResultSource::Error);
    assert!(result.translated_text.starts_with("Translation error"));
}

#[tokio::test]
async fn test_translate_failingLoader_shouldFallBackAndCacheFailure() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-bn").unwrap();
    let loader = MockLoader::failing();
    let orchestrator = orchestrator_with(&root, &loader);

    for _ in 0..3 {
        let result = orchestrator.translate("The garden needs water", "bn").await;
        assert_eq!(result.source, ResultSource::Fallback);
        assert_eq!(result.metrics, fallback_metrics());
    }
    assert_eq!(loader.instantiation_count(), 1);
}

#[tokio::test]
async fn test_translate_unsupportedTarget_shouldSubstituteDefault() {
    let root = ModelRoot::new().unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));

    let result = orchestrator.translate("Thank you", "klingon").await;

    assert_eq!(result.target_language, "ja");
    assert_eq!(result.translated_text, "ありがとうございます");
}

#[tokio::test]
async fn test_translate_everySupportedLanguage_shouldReturnBoundedNonEmptyResult() {
    let root = ModelRoot::new().unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));
    let inputs = ["Hello", "x", "Thank you. See you later!", "Quantum lanterns drift over the river"];

    for (code, _) in SUPPORTED_LANGUAGES {
        for input in inputs {
            let result = orchestrator.translate(input, code).await;
            assert!(!result.translated_text.is_empty(), "empty result for {} -> {}", input, code);
            assert!(result.metrics.is_within_bounds());
        }
    }
}

#[tokio::test]
async fn test_translate_customExamples_shouldDriveShortcutAndFallback() {
    let root = ModelRoot::new().unwrap();
    let examples = Arc::new(ReferenceExamples::from_entries(vec![
        ("fil", "good evening", "Magandang gabi"),
        ("fil", "friend", "kaibigan"),
    ]));
    let orchestrator =
        orchestrator_with(&root, &MockLoader::new(MockBackend::working())).with_examples(examples);

    let shortcut = orchestrator.translate("Good evening", "fil").await;
    assert_eq!(shortcut.source, ResultSource::Reference);
    assert_eq!(shortcut.translated_text, "Magandang gabi");
    assert_eq!(shortcut.metrics, TranslationMetrics::perfect());

    let phrase = orchestrator.translate("Good evening my friend", "fil").await;
    assert_eq!(phrase.source, ResultSource::Fallback);
    assert_eq!(phrase.translated_text, "Magandang gabi my kaibigan");

    let builtin = orchestrator.translate("Good morning", "ja").await;
    assert_eq!(builtin.source, ResultSource::Fallback);
    assert_ne!(builtin.translated_text, "おはようございます");
}

#[tokio::test]
async fn test_translate_outOfRangeFallbackMetrics_shouldBeClamped() {
    init_logging();
    let root = ModelRoot::new().unwrap();
    let mut config = test_config(root.path());
    config.fallback_metrics = serde_json::from_str(r#"{"bleu": 1.7, "rouge": -0.2, "meteor": 0.5}"#).unwrap();
    let orchestrator = TranslationOrchestrator::new(config, Arc::new(MockLoader::new(MockBackend::working())));

    let result = orchestrator.translate("The lighthouse is far away", "vi").await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(result.metrics, TranslationMetrics::new(1.0, 0.0, 0.5));
    assert!(result.metrics.is_within_bounds());
}

#[tokio::test]
async fn test_translate_invertedLengthBounds_shouldStillGenerate() {
    init_logging();
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let mut config = test_config(root.path());
    config.generation.min_length = 400;
    config.generation.max_length = 100;
    let orchestrator = TranslationOrchestrator::new(config, Arc::new(loader.clone()));

    let result = orchestrator.translate("The lighthouse is far away", "ja").await;

    assert_eq!(result.source, ResultSource::Backend);
    assert_eq!(loader.backend().requests()[0].params.max_length, 100);
}
