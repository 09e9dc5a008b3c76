/*!
 * Translation orchestrator.
 *
 * Single entry point for translation. For every request it:
 * 1. resolves the target language (unsupported codes fall back to the default)
 * 2. makes sure the pair's backend is loaded, if the registry lists one
 * 3. answers canonical phrases straight from the reference examples
 * 4. generates with the backend, retrying short inputs once on invalid output
 * 5. falls back to the phrase translator when no valid output was produced
 *
 * Faults in steps 2 to 4, panics included, become a localized error message.
 * `translate` itself never fails.
 */

use futures::FutureExt;
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::app_config::Config;
use crate::backends::process::ProcessBackendLoader;
use crate::backends::{BackendLoader, GenerationParams, GenerationRequest, UnavailableLoader};
use crate::errors::{BackendError, TranslationError, panic_message};
use crate::language_utils::{
    SUPPORTED_LANGUAGES, backend_language_token, localized_error_message, normalize_code, resolve_target_language,
};

use super::cache::{BackendCache, LoadOutcome, LoadedBackendHandle};
use super::delay::{self, DelayStrategy};
use super::fallback::{FallbackTranslation, PhraseFallbackTranslator};
use super::quality::{Evaluator, TranslationMetrics};
use super::reference::ReferenceExamples;
use super::registry::{self, LanguagePairDescriptor, PairKey, RegistrySnapshot};

/// Where the text of a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// A reference example matched the input
    Reference,
    /// The neural backend generated it
    Backend,
    /// The phrase fallback translator produced it
    Fallback,
    /// A localized error message
    Error,
}

/// Internal outcome of one pass through the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Generated {
        text: String,
        metrics: TranslationMetrics,
        source: ResultSource,
    },
    FallbackUsed {
        translation: FallbackTranslation,
    },
    Errored {
        message: String,
    },
}

/// Final translation returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub metrics: TranslationMetrics,
    pub source: ResultSource,
    /// Target language actually used
    pub target_language: String,
}

/// Catalogue entry for one target language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    /// Whether a dedicated backend was discovered for this target
    pub finetuned: bool,
}

/// Snapshot of backend availability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub available_models: usize,
    pub loaded_models: usize,
    pub source_language: String,
    pub device: String,
    pub model_root: String,
    pub pairs: Vec<String>,
    pub loaded_pairs: Vec<String>,
}

/// Translation service owning the backend cache and configuration
#[derive(Debug)]
pub struct TranslationOrchestrator {
    config: Config,
    registry: RwLock<Arc<RegistrySnapshot>>,
    loader: Arc<dyn BackendLoader>,
    cache: BackendCache,
    examples: Arc<ReferenceExamples>,
    fallback: PhraseFallbackTranslator,
    evaluator: Evaluator,
    delay: Arc<dyn DelayStrategy>,
}

impl TranslationOrchestrator {
    /// Create an orchestrator using `loader`, discovering backends under the configured root
    pub fn new(mut config: Config, loader: Arc<dyn BackendLoader>) -> Self {
        let metrics = config.fallback_metrics;
        config.fallback_metrics = TranslationMetrics::new(metrics.bleu, metrics.rouge, metrics.meteor);
        if config.fallback_metrics != metrics {
            warn!("Fallback metrics {:?} clamped into [0, 1]", metrics);
        }

        let snapshot = registry::discover(&config.model_root);
        let examples = ReferenceExamples::builtin();
        let delay = delay::from_config(&config.delay);
        Self {
            registry: RwLock::new(Arc::new(snapshot)),
            loader,
            cache: BackendCache::new(),
            fallback: PhraseFallbackTranslator::new(Arc::clone(&examples)),
            examples,
            evaluator: Evaluator::new(),
            delay,
            config,
        }
    }

    /// Create an orchestrator whose loader is chosen by the configuration
    pub fn from_config(config: Config) -> Result<Self, BackendError> {
        let loader: Arc<dyn BackendLoader> = match &config.backend_command {
            Some(command) => Arc::new(ProcessBackendLoader::new(command)?),
            None => {
                info!("No backend command configured, translations will use the fallback translator");
                Arc::new(UnavailableLoader)
            }
        };
        Ok(Self::new(config, loader))
    }

    /// Replace the registry snapshot and drop every cached backend
    pub fn with_registry(self, snapshot: RegistrySnapshot) -> Self {
        *self.registry.write() = Arc::new(snapshot);
        self.cache.clear();
        self
    }

    /// Use different reference examples for shortcuts, scoring and fallback
    pub fn with_examples(mut self, examples: Arc<ReferenceExamples>) -> Self {
        self.fallback = PhraseFallbackTranslator::new(Arc::clone(&examples));
        self.examples = examples;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn DelayStrategy>) -> Self {
        self.delay = delay;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &BackendCache {
        &self.cache
    }

    /// Current registry snapshot
    pub fn registry(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.registry.read())
    }

    /// Translate `text` into `target_language`
    ///
    /// Empty input must be rejected by the caller.
    pub async fn translate(&self, text: &str, target_language: &str) -> TranslationResult {
        let (target, _) = self.resolve_target(target_language);
        let outcome = self.translate_resolved(text, &target).await;
        self.into_result(outcome, target)
    }

    /// Run the state machine and return its outcome without flattening it
    pub async fn translate_outcome(&self, text: &str, target_language: &str) -> TranslationOutcome {
        let (target, _) = self.resolve_target(target_language);
        self.translate_resolved(text, &target).await
    }

    fn resolve_target(&self, requested: &str) -> (String, bool) {
        let (target, substituted) = resolve_target_language(requested, &self.config.default_target_language);
        if substituted {
            warn!("Unsupported target language '{}', using '{}' instead", requested, target);
        }
        (target, substituted)
    }

    async fn translate_resolved(&self, text: &str, target: &str) -> TranslationOutcome {
        let source = normalize_code(&self.config.source_language);

        match AssertUnwindSafe(self.dispatch(text, &source, target)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("Translation {}-{} failed: {}", source, target, e);
                TranslationOutcome::Errored {
                    message: localized_error_message(target, &e.to_string()),
                }
            }
            Err(payload) => {
                let e = TranslationError::Panicked(panic_message(payload.as_ref()));
                error!("Translation {}-{} failed: {}", source, target, e);
                TranslationOutcome::Errored {
                    message: localized_error_message(target, &e.to_string()),
                }
            }
        }
    }

    async fn dispatch(&self, text: &str, source: &str, target: &str) -> Result<TranslationOutcome, TranslationError> {
        let handle = self.ensure_loaded(source, target).await;

        if let Some(reference) = self.examples.lookup(target, text) {
            debug!("Reference example matched for {}", target);
            let metrics = self.evaluator.evaluate(text, reference, Some(reference));
            return Ok(TranslationOutcome::Generated {
                text: reference.to_string(),
                metrics,
                source: ResultSource::Reference,
            });
        }

        let Some(handle) = handle else {
            return Ok(self.fallback(text, target));
        };

        let pause = self.delay.delay_for(text);
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let word_count = text.split_whitespace().count();
        let primary = self.request(text, source, target, self.primary_params(word_count));
        let output = handle.backend.generate(&primary).await?;
        if self.is_valid_output(&output, text) {
            return Ok(self.scored(text, target, output));
        }
        warn!("Backend {} returned invalid output for {}-{}", handle.backend.name(), source, target);

        if word_count <= self.config.generation.retry_word_limit {
            info!("Retrying short input with deterministic decoding");
            let retry = self.request(text, source, target, self.retry_params());
            match handle.backend.generate(&retry).await {
                Ok(output) if self.is_valid_output(&output, text) => {
                    return Ok(self.scored(text, target, output));
                }
                Ok(_) => warn!("Retry output for {}-{} was also invalid", source, target),
                Err(e) => warn!("Retry for {}-{} failed: {}", source, target, e),
            }
        }

        Ok(self.fallback(text, target))
    }

    /// Loaded handle for the pair, or `None` when it is not usable
    async fn ensure_loaded(&self, source: &str, target: &str) -> Option<Arc<LoadedBackendHandle>> {
        let snapshot = self.registry();
        let Some(descriptor) = snapshot.get(source, target) else {
            debug!("No backend registered for {}-{}", source, target);
            return None;
        };

        match self.load(descriptor.clone()).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Backend for {}-{} unavailable: {}", source, target, e);
                None
            }
        }
    }

    async fn load(&self, descriptor: LanguagePairDescriptor) -> LoadOutcome {
        let key = descriptor.pair_key();
        let loader = Arc::clone(&self.loader);
        let device = self.config.device;

        self.cache
            .get_or_load(&key, || async move {
                info!("Loading backend for {} on {}", descriptor.key(), device);
                let backend = loader.load(&descriptor, device).await?;
                info!("Backend for {} loaded", descriptor.key());
                Ok(Arc::new(LoadedBackendHandle {
                    descriptor,
                    backend,
                    device,
                }))
            })
            .await
    }

    fn request(&self, text: &str, source: &str, target: &str, params: GenerationParams) -> GenerationRequest {
        GenerationRequest {
            text: text.to_string(),
            source_language: source.to_string(),
            target_language: target.to_string(),
            forced_token: backend_language_token(target).unwrap_or("en_XX").to_string(),
            params,
        }
    }

    fn primary_params(&self, word_count: usize) -> GenerationParams {
        let generation = &self.config.generation;
        GenerationParams {
            max_length: generation.length_budget(word_count),
            num_beams: generation.num_beams,
            length_penalty: generation.length_penalty,
            no_repeat_ngram_size: generation.no_repeat_ngram_size,
            temperature: generation.temperature,
            top_k: generation.top_k,
            do_sample: true,
        }
    }

    fn retry_params(&self) -> GenerationParams {
        let generation = &self.config.generation;
        GenerationParams {
            max_length: generation.retry_max_length,
            num_beams: generation.retry_num_beams,
            length_penalty: generation.length_penalty,
            no_repeat_ngram_size: generation.no_repeat_ngram_size,
            temperature: generation.retry_temperature,
            top_k: generation.top_k,
            do_sample: false,
        }
    }

    fn is_valid_output(&self, output: &str, input: &str) -> bool {
        let output = output.trim();
        !output.is_empty()
            && output != input.trim()
            && output.chars().count() >= self.config.generation.min_output_chars
    }

    fn scored(&self, text: &str, target: &str, output: String) -> TranslationOutcome {
        let output = output.trim().to_string();
        let reference = self.examples.lookup(target, text);
        let metrics = self.evaluator.evaluate(text, &output, reference);
        TranslationOutcome::Generated {
            text: output,
            metrics,
            source: ResultSource::Backend,
        }
    }

    fn fallback(&self, text: &str, target: &str) -> TranslationOutcome {
        let translation = self.fallback.translate(text, target);
        info!(
            "Using fallback translation for {} ({:?}, confidence {:.2})",
            target, translation.method, translation.confidence
        );
        TranslationOutcome::FallbackUsed { translation }
    }

    fn into_result(&self, outcome: TranslationOutcome, target_language: String) -> TranslationResult {
        let (translated_text, metrics, source) = match outcome {
            TranslationOutcome::Generated { text, metrics, source } => (text, metrics, source),
            TranslationOutcome::FallbackUsed { translation } => {
                (translation.text, self.config.fallback_metrics, ResultSource::Fallback)
            }
            TranslationOutcome::Errored { message } => (message, self.config.fallback_metrics, ResultSource::Error),
        };
        TranslationResult {
            translated_text,
            metrics,
            source,
            target_language,
        }
    }

    /// Supported targets other than the source language, sorted by name
    pub fn available_languages(&self) -> Vec<LanguageInfo> {
        let source = normalize_code(&self.config.source_language);
        let snapshot = self.registry();

        let mut languages: Vec<LanguageInfo> = SUPPORTED_LANGUAGES
            .iter()
            .filter(|(code, _)| *code != source)
            .map(|(code, name)| LanguageInfo {
                code: code.to_string(),
                name: name.to_string(),
                finetuned: snapshot.contains(&source, code),
            })
            .collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        languages
    }

    /// Backend availability report
    pub fn model_info(&self) -> ModelInfo {
        let snapshot = self.registry();
        ModelInfo {
            available_models: snapshot.len(),
            loaded_models: self.cache.loaded_count(),
            source_language: self.config.source_language.clone(),
            device: self.config.device.to_string(),
            model_root: snapshot.root().display().to_string(),
            pairs: snapshot.keys(),
            loaded_pairs: self.cache.loaded_pairs(),
        }
    }

    /// Load the first configured preload pair the registry lists
    ///
    /// Returns the pair that was loaded, if any.
    pub async fn preload(&self) -> Option<String> {
        let snapshot = self.registry();
        for pair in &self.config.preload_pairs {
            let Some(key) = PairKey::parse(pair) else {
                warn!("Ignoring malformed preload pair '{}'", pair);
                continue;
            };
            let Some(descriptor) = snapshot.get(&key.source, &key.target) else {
                debug!("Preload pair {} not available", key);
                continue;
            };

            match self.load(descriptor.clone()).await {
                Ok(_) => {
                    info!("Preloaded backend for {}", key);
                    return Some(key.to_string());
                }
                Err(e) => warn!("Could not preload {}: {}", key, e),
            }
        }
        None
    }

    /// Discover backends again and drop every cached handle
    pub fn rescan(&self) -> usize {
        let snapshot = registry::discover(&self.config.model_root);
        let count = snapshot.len();
        *self.registry.write() = Arc::new(snapshot);
        self.cache.clear();
        info!("Registry rescanned: {} backend(s) available", count);
        count
    }

    /// Replace the cached backend of one pair with a fresh load
    pub async fn reload(&self, source: &str, target: &str) -> Result<(), BackendError> {
        let key = PairKey::new(source, target);
        self.cache.invalidate(&key);

        let descriptor = self
            .registry()
            .get(source, target)
            .cloned()
            .ok_or_else(|| BackendError::NotRegistered(key.to_string()))?;
        self.load(descriptor).await.map(|_| ())
    }
}
