/*!
 * Injectable delay applied before each backend generation.
 *
 * Production uses `NoDelay`. The other strategies reproduce simulated
 * latency for demos and timing tests without coupling results to
 * unseeded randomness.
 */

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::DelayConfig;

/// Decides how long to wait before generating a translation
pub trait DelayStrategy: Send + Sync + Debug {
    /// Delay to apply for the given input text
    fn delay_for(&self, text: &str) -> Duration;
}

/// No delay at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayStrategy for NoDelay {
    fn delay_for(&self, _text: &str) -> Duration {
        Duration::ZERO
    }
}

/// The same delay for every request
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelayStrategy for FixedDelay {
    fn delay_for(&self, _text: &str) -> Duration {
        self.0
    }
}

/// A base delay plus a per-character increment, capped
#[derive(Debug, Clone, Copy)]
pub struct ScaledDelay {
    pub base: Duration,
    pub per_char: Duration,
    pub max: Duration,
}

impl Default for ScaledDelay {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(300),
            per_char: Duration::from_millis(5),
            max: Duration::from_millis(1500),
        }
    }
}

impl DelayStrategy for ScaledDelay {
    fn delay_for(&self, text: &str) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        let scaled = self.base.saturating_add(self.per_char.saturating_mul(chars));
        scaled.min(self.max)
    }
}

/// Uniformly random delay in `[min, max]` from a seeded generator
#[derive(Debug)]
pub struct JitterDelay {
    min: Duration,
    max: Duration,
    rng: Mutex<StdRng>,
}

impl JitterDelay {
    pub fn new(min: Duration, max: Duration, seed: u64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DelayStrategy for JitterDelay {
    fn delay_for(&self, _text: &str) -> Duration {
        let fraction: f64 = self.rng.lock().random();
        self.min + (self.max - self.min).mul_f64(fraction)
    }
}

/// Build the strategy described by the configuration
pub fn from_config(config: &DelayConfig) -> Arc<dyn DelayStrategy> {
    match *config {
        DelayConfig::None => Arc::new(NoDelay),
        DelayConfig::Fixed { millis } => Arc::new(FixedDelay(Duration::from_millis(millis))),
        DelayConfig::Scaled {
            base_millis,
            per_char_millis,
            max_millis,
        } => Arc::new(ScaledDelay {
            base: Duration::from_millis(base_millis),
            per_char: Duration::from_millis(per_char_millis),
            max: Duration::from_millis(max_millis),
        }),
        DelayConfig::Jitter {
            min_millis,
            max_millis,
            seed,
        } => Arc::new(JitterDelay::new(
            Duration::from_millis(min_millis),
            Duration::from_millis(max_millis),
            seed,
        )),
    }
}
