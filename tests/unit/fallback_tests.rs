/*!
 * Tests for the phrase fallback translator
 */

use std::sync::Arc;

use altrans::language_utils::SUPPORTED_LANGUAGES;
use altrans::translation::fallback::{PLACEHOLDER_CONFIDENCE, data_availability_factor};
use altrans::translation::{FallbackMethod, PhraseFallbackTranslator, ReferenceExamples};

use crate::common::long_text;

#[test]
fn test_translate_exactPhrase_shouldReturnDictionaryEntry() {
    let translator = PhraseFallbackTranslator::default();

    let result = translator.translate("THANK YOU", "zh");

    assert_eq!(result.text, "谢谢");
    assert_eq!(result.method, FallbackMethod::ExactMatch);
    assert_eq!(result.confidence, 0.98);
}

#[test]
fn test_translate_customExamples_shouldDriveDictionary() {
    let examples = Arc::new(ReferenceExamples::from_entries(vec![
        ("fil", "good evening", "Magandang gabi"),
        ("fil", "friend", "kaibigan"),
    ]));
    let translator = PhraseFallbackTranslator::new(examples);

    let result = translator.translate("Good evening my friend", "fil");

    assert_eq!(result.method, FallbackMethod::PhraseMatch);
    assert_eq!(result.text, "Magandang gabi my kaibigan");
    // 3 of 4 words matched, 22 chars, medium tier
    let expected = 0.75 * (1.0 - 0.5 * 22.0 / 500.0) * 0.85;
    assert!((result.confidence - expected).abs() < 1e-9);
}

#[test]
fn test_translate_multipleSentences_shouldKeepSpaceAfterPunctuation() {
    let translator = PhraseFallbackTranslator::default();

    let result = translator.translate("Thank you. Good night!", "ja");

    assert_eq!(result.method, FallbackMethod::PhraseMatch);
    assert_eq!(result.text, "ありがとうございます. おやすみなさい!");
}

#[test]
fn test_translate_longInput_shouldBottomOutLengthFactor() {
    let translator = PhraseFallbackTranslator::default();

    let result = translator.translate(&long_text(200), "vi");

    assert_eq!(result.method, FallbackMethod::PhraseMatch);
    assert!(result.text.contains("Xin chào"));
    assert!(result.confidence >= 0.3 && result.confidence <= 0.95);
}

#[test]
fn test_translate_unknownLanguage_shouldUsePlaceholder() {
    let translator = PhraseFallbackTranslator::default();

    let result = translator.translate("", "de");

    assert_eq!(result.method, FallbackMethod::Placeholder);
    assert_eq!(result.confidence, PLACEHOLDER_CONFIDENCE);
}

#[test]
fn test_translate_everyLanguage_shouldStayWithinConfidenceBounds() {
    let translator = PhraseFallbackTranslator::default();
    let inputs = ["Hello", "How are you?", "", "zzz", "I love languages and rivers", &long_text(120)];

    for (code, _) in SUPPORTED_LANGUAGES {
        for input in inputs {
            let result = translator.translate(input, code);
            assert!(
                (0.2..=0.98).contains(&result.confidence),
                "{} for {:?} -> {}",
                result.confidence,
                input,
                code
            );
            assert!(!result.text.is_empty());
        }
    }
}

#[test]
fn test_dataAvailabilityFactor_shouldFollowTiers() {
    assert_eq!(data_availability_factor("ja"), 1.0);
    assert_eq!(data_availability_factor("bn"), 0.85);
    assert_eq!(data_availability_factor("my"), 0.7);
    assert_eq!(data_availability_factor("unknown"), 0.7);
}
