/*!
 * Backend implementations for neural translation.
 *
 * A backend is an opaque text generator: given source text, a forced
 * target-language token and decoding parameters it produces translated
 * text. Backends are instantiated per language pair by a `BackendLoader`.
 *
 * - `process`: runs a configured external command per request
 * - `mock`: in-memory backends with instrumentation, for tests and benches
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use crate::errors::BackendError;
use crate::translation::registry::LanguagePairDescriptor;

pub mod mock;
pub mod process;

/// Compute device a backend is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceAffinity {
    #[default]
    Cpu,
    Cuda,
}

impl Display for DeviceAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAffinity::Cpu => write!(f, "cpu"),
            DeviceAffinity::Cuda => write!(f, "cuda"),
        }
    }
}

/// Decoding configuration for one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of generated tokens
    pub max_length: usize,
    /// Beam width
    pub num_beams: usize,
    /// Exponential length penalty for beam scoring
    pub length_penalty: f64,
    /// Forbid repeating n-grams of this size
    pub no_repeat_ngram_size: usize,
    /// Sampling temperature
    pub temperature: f64,
    /// Top-k sampling cutoff
    pub top_k: usize,
    /// Whether to sample instead of decoding greedily
    pub do_sample: bool,
}

/// A single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Source text
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Token that forces the decoder into the target language
    pub forced_token: String,
    /// Decoding parameters
    pub params: GenerationParams,
}

/// Common trait for all neural translation backends
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Generate a translation for the request
    ///
    /// # Returns
    /// * `Result<String, BackendError>` - The raw generated text or an error
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;

    /// Short human-readable backend name for diagnostics
    fn name(&self) -> &str;
}

/// Instantiates backends for discovered language pairs
#[async_trait]
pub trait BackendLoader: Send + Sync + Debug {
    /// Load the backend stored under the descriptor's directory
    ///
    /// # Arguments
    /// * `descriptor` - Discovered language pair to load
    /// * `device` - Device to place the backend on
    async fn load(
        &self,
        descriptor: &LanguagePairDescriptor,
        device: DeviceAffinity,
    ) -> Result<Arc<dyn Backend>, BackendError>;
}

/// Loader used when no backend runtime is configured
///
/// Every load fails, so all traffic is served by the fallback translator.
#[derive(Debug, Clone, Default)]
pub struct UnavailableLoader;

#[async_trait]
impl BackendLoader for UnavailableLoader {
    async fn load(
        &self,
        descriptor: &LanguagePairDescriptor,
        _device: DeviceAffinity,
    ) -> Result<Arc<dyn Backend>, BackendError> {
        Err(BackendError::RuntimeUnavailable(format!(
            "no backend command configured for {}",
            descriptor.key()
        )))
    }
}
