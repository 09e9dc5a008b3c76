/*!
 * # altrans - Adaptive Language Translation
 *
 * A Rust library that serves text translations through a chain of
 * backends of varying quality and scores every result.
 *
 * ## Features
 *
 * - Discover per-language-pair neural backends on disk
 * - Load each backend at most once, even under concurrent requests
 * - Answer canonical phrases from curated reference examples
 * - Retry short inputs once when a backend returns unusable output
 * - Fall back to a dictionary and longest-phrase translator
 * - Score translations with BLEU, ROUGE and METEOR
 * - 13 supported target languages
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Orchestration and scoring:
 *   - `translation::registry`: Backend discovery
 *   - `translation::cache`: Loaded backend cache
 *   - `translation::orchestrator`: Dispatch, retry and fallback
 *   - `translation::fallback`: Phrase fallback translator
 *   - `translation::quality`: Quality evaluator
 * - `backends`: Backend contract and implementations:
 *   - `backends::process`: External command backend
 *   - `backends::mock`: Instrumented in-memory backends
 * - `language_utils`: Supported languages and per-language data
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod backends;
pub mod errors;
pub mod language_utils;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, BackendError, ScoringError, TranslationError};
pub use language_utils::{get_language_name, is_supported};
pub use translation::{Evaluator, TranslationMetrics, TranslationOrchestrator, TranslationResult};
