/*!
 * Mock backend implementations for testing.
 *
 * This module provides backends that simulate different behaviors:
 * - `MockBackend::working()` - Always produces a tagged translation
 * - `MockBackend::echo()` - Returns the input unchanged (invalid output)
 * - `MockBackend::invalid_then_valid()` - Echoes once, then works
 * - `MockBackend::failing()` / `panicking()` - Error or panic on every call
 *
 * `MockLoader` hands out clones of a template backend and counts how many
 * times it instantiated one.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::backends::{Backend, BackendLoader, DeviceAffinity, GenerationRequest};
use crate::errors::BackendError;
use crate::translation::registry::LanguagePairDescriptor;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tagged translation
    Working,
    /// Returns the trimmed input unchanged
    Echo,
    /// Returns an empty string
    Empty,
    /// Echoes on the first call, then behaves like `Working`
    InvalidThenValid,
    /// Always fails with a generation error
    Failing,
    /// Panics inside generation
    Panicking,
}

/// Mock backend for testing orchestration behavior
#[derive(Debug, Clone)]
pub struct MockBackend {
    behavior: MockBehavior,
    generation_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    custom_response: Option<fn(&GenerationRequest) -> String>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            generation_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn invalid_then_valid() -> Self {
        Self::new(MockBehavior::InvalidThenValid)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn panicking() -> Self {
        Self::new(MockBehavior::Panicking)
    }

    /// Set a custom response generator for the working behavior
    pub fn with_custom_response(mut self, generator: fn(&GenerationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of generate calls across all clones
    pub fn generation_count(&self) -> usize {
        self.generation_count.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    fn translate(&self, request: &GenerationRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[{}] {}", request.forced_token, request.text.trim()),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let count = self.generation_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.translate(request)),
            MockBehavior::Echo => Ok(request.text.trim().to_string()),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::InvalidThenValid => {
                if count == 0 {
                    Ok(request.text.trim().to_string())
                } else {
                    Ok(self.translate(request))
                }
            }
            MockBehavior::Failing => Err(BackendError::Generation("Simulated backend failure".to_string())),
            MockBehavior::Panicking => panic!("simulated backend panic"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Loader that instantiates clones of a template `MockBackend`
#[derive(Debug, Clone)]
pub struct MockLoader {
    template: MockBackend,
    instantiations: Arc<AtomicUsize>,
    fail_loads: bool,
    panic_loads: bool,
    load_delay: Duration,
}

impl MockLoader {
    /// Create a loader handing out clones of `template`
    pub fn new(template: MockBackend) -> Self {
        Self {
            template,
            instantiations: Arc::new(AtomicUsize::new(0)),
            fail_loads: false,
            panic_loads: false,
            load_delay: Duration::ZERO,
        }
    }

    /// Create a loader whose every load fails
    pub fn failing() -> Self {
        Self {
            fail_loads: true,
            ..Self::new(MockBackend::working())
        }
    }

    /// Create a loader that panics inside every load
    pub fn panicking() -> Self {
        Self {
            panic_loads: true,
            ..Self::new(MockBackend::working())
        }
    }

    /// Sleep for `delay` inside every load
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Number of load attempts across all clones
    pub fn instantiation_count(&self) -> usize {
        self.instantiations.load(Ordering::SeqCst)
    }

    /// The template backend; its counters are shared with loaded instances
    pub fn backend(&self) -> &MockBackend {
        &self.template
    }
}

#[async_trait]
impl BackendLoader for MockLoader {
    async fn load(
        &self,
        descriptor: &LanguagePairDescriptor,
        _device: DeviceAffinity,
    ) -> Result<Arc<dyn Backend>, BackendError> {
        self.instantiations.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        if self.panic_loads {
            panic!("simulated loader panic");
        }
        if self.fail_loads {
            return Err(BackendError::LoadFailed {
                pair: descriptor.key(),
                message: "Simulated load failure".to_string(),
            });
        }
        Ok(Arc::new(self.template.clone()))
    }
}
