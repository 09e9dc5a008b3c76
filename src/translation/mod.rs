/*!
 * Translation orchestration and scoring.
 *
 * This module contains everything between a translation request and its
 * scored result. It is split into several submodules:
 *
 * - `registry`: Discovery of per-language-pair backends on disk
 * - `cache`: Single-flight cache of loaded backend instances
 * - `reference`: Curated reference examples
 * - `fallback`: Dictionary-based fallback translator
 * - `delay`: Injectable pre-generation delay strategies
 * - `orchestrator`: The dispatch, retry and fallback state machine
 * - `quality`: BLEU, ROUGE and METEOR scoring
 */

// Re-export main types for easier usage
pub use self::cache::{BackendCache, LoadedBackendHandle};
pub use self::fallback::{FallbackMethod, FallbackTranslation, PhraseFallbackTranslator};
pub use self::orchestrator::{
    LanguageInfo, ModelInfo, ResultSource, TranslationOrchestrator, TranslationOutcome, TranslationResult,
};
pub use self::quality::{Evaluator, TranslationMetrics};
pub use self::reference::{ReferenceExample, ReferenceExamples};
pub use self::registry::{LanguagePairDescriptor, ModelMetadata, PairKey, RegistrySnapshot};

// Submodules
pub mod cache;
pub mod delay;
pub mod fallback;
pub mod orchestrator;
pub mod quality;
pub mod reference;
pub mod registry;
