/*!
 * Service lifecycle: discovery, preload, rescan, reload and external backends
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use altrans::backends::mock::{MockBackend, MockLoader};
use altrans::errors::BackendError;
use altrans::translation::delay::FixedDelay;
use altrans::translation::{ResultSource, TranslationOrchestrator};

use crate::common::{ModelRoot, init_logging, orchestrator_with, test_config};

#[tokio::test]
async fn test_modelInfo_shouldListOnlyCompletePairs() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    root.add_pair("en-zh").unwrap();
    root.add_weights_only("en-th").unwrap();
    root.add_config_only("en-km").unwrap();
    root.write_metadata("en-zh", "{ definitely not json").unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));

    let info = orchestrator.model_info();

    assert_eq!(info.available_models, 2);
    assert_eq!(info.pairs, vec!["en-ja".to_string(), "en-zh".to_string()]);
    assert_eq!(info.loaded_models, 0);
    assert_eq!(info.device, "cpu");
}

#[tokio::test]
async fn test_availableLanguages_shouldExcludeSourceAndFlagFinetuned() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));

    let languages = orchestrator.available_languages();

    assert_eq!(languages.len(), 12);
    assert!(languages.iter().all(|l| l.code != "en"));
    assert!(languages.windows(2).all(|w| w[0].name <= w[1].name));
    let japanese = languages.iter().find(|l| l.code == "ja").unwrap();
    assert!(japanese.finetuned);
    assert!(languages.iter().filter(|l| l.finetuned).count() == 1);
}

#[tokio::test]
async fn test_preload_shouldStopAtFirstAvailablePair() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-zh").unwrap();
    root.add_pair("en-hi").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);

    let loaded = orchestrator.preload().await;

    assert_eq!(loaded.as_deref(), Some("en-zh"));
    assert_eq!(loader.instantiation_count(), 1);
    assert_eq!(orchestrator.model_info().loaded_pairs, vec!["en-zh".to_string()]);
}

#[tokio::test]
async fn test_preload_withFailingLoader_shouldTryEveryPair() {
    let root = ModelRoot::new().unwrap();
    for pair in ["en-ja", "en-zh", "en-hi"] {
        root.add_pair(pair).unwrap();
    }
    let loader = MockLoader::failing();
    let orchestrator = orchestrator_with(&root, &loader);

    assert_eq!(orchestrator.preload().await, None);
    assert_eq!(loader.instantiation_count(), 3);
}

#[tokio::test]
async fn test_rescan_shouldPickUpNewPairsAndDropCache() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);
    orchestrator.translate("The bus is late", "ja").await;

    let before = orchestrator.translate("The bus is late", "vi").await;
    assert_eq!(before.source, ResultSource::Fallback);

    root.add_pair("en-vi").unwrap();
    assert_eq!(orchestrator.rescan(), 2);
    assert_eq!(orchestrator.model_info().loaded_models, 0);

    let after = orchestrator.translate("The bus is late", "vi").await;
    assert_eq!(after.source, ResultSource::Backend);
}

#[tokio::test]
async fn test_reload_shouldReplaceHandle() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let loader = MockLoader::new(MockBackend::working());
    let orchestrator = orchestrator_with(&root, &loader);
    orchestrator.translate("The bus is late", "ja").await;

    orchestrator.reload("en", "ja").await.unwrap();

    assert_eq!(loader.instantiation_count(), 2);
    assert_eq!(orchestrator.model_info().loaded_models, 1);
}

#[test]
fn test_reload_unregisteredPair_shouldFail() {
    let root = ModelRoot::new().unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()));

    let result = tokio_test::block_on(orchestrator.reload("en", "lo"));

    assert_eq!(result, Err(BackendError::NotRegistered("en-lo".to_string())));
}

#[tokio::test]
async fn test_translate_withFixedDelay_shouldWaitBeforeGenerating() {
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let orchestrator = orchestrator_with(&root, &MockLoader::new(MockBackend::working()))
        .with_delay(Arc::new(FixedDelay(Duration::from_millis(40))));

    let started = Instant::now();
    let result = orchestrator.translate("The bus is late", "ja").await;

    assert_eq!(result.source, ResultSource::Backend);
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn test_fromConfig_withoutBackendCommand_shouldServeFallback() {
    init_logging();
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let orchestrator = TranslationOrchestrator::from_config(test_config(root.path())).unwrap();

    let result = orchestrator.translate("The bus is late", "ja").await;

    assert_eq!(result.source, ResultSource::Fallback);
    assert_eq!(orchestrator.model_info().available_models, 1);
    assert_eq!(orchestrator.model_info().loaded_models, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_fromConfig_withProcessBackend_shouldTranslateThroughCommand() {
    init_logging();
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let mut config = test_config(root.path());
    config.backend_command = Some(vec!["sh".to_string(), "-c".to_string(), "tr a-z A-Z".to_string()]);
    let orchestrator = TranslationOrchestrator::from_config(config).unwrap();

    let result = orchestrator.translate("the bus is late", "ja").await;

    assert_eq!(result.source, ResultSource::Backend);
    assert_eq!(result.translated_text, "THE BUS IS LATE");
    assert_eq!(result.metrics.meteor, 1.0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_fromConfig_withProcessBackend_shouldTranslateLargeInput() {
    init_logging();
    let root = ModelRoot::new().unwrap();
    root.add_pair("en-ja").unwrap();
    let mut config = test_config(root.path());
    config.backend_command = Some(vec!["sh".to_string(), "-c".to_string(), "tr a-z A-Z".to_string()]);
    let orchestrator = TranslationOrchestrator::from_config(config).unwrap();
    // over 200 KB in 2,000 tokens
    let text = format!("{} ", "lantern".repeat(15)).repeat(2_000);

    let result = tokio::time::timeout(Duration::from_secs(30), orchestrator.translate(&text, "ja"))
        .await
        .expect("translation should not stall on a full pipe");

    assert_eq!(result.source, ResultSource::Backend);
    assert_eq!(result.translated_text, text.trim().to_uppercase());
}
