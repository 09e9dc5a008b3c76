/*!
 * Error types for the altrans application.
 *
 * This module contains custom error types for the different layers of the
 * translation service, using the thiserror crate for ergonomic definitions.
 * None of these ever reach a `translate` caller: the orchestrator converts
 * them into fallback or localized error results.
 */

use std::any::Any;
use thiserror::Error;

/// Errors that can occur when loading or invoking a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The registry does not list the requested language pair
    #[error("No backend registered for {0}")]
    NotRegistered(String),

    /// The backend directory was found but could not be instantiated
    #[error("Failed to load backend for {pair}: {message}")]
    LoadFailed {
        /// Language pair key (e.g. "en-ja")
        pair: String,
        /// Reason reported by the loader
        message: String,
    },

    /// No runtime capable of executing backends is configured
    #[error("Backend runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// The backend was invoked but failed to produce output
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The backend configuration artifact is malformed
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while computing a single quality metric
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// The metric produced NaN or infinity
    #[error("{metric} produced a non-finite value")]
    NonFinite {
        /// Metric name
        metric: &'static str,
    },

    /// The metric produced a value outside [0, 1]
    #[error("{metric} produced {value}, outside [0, 1]")]
    OutOfRange {
        /// Metric name
        metric: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Errors that can occur inside the orchestration state machine
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from a backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The backend panicked while generating
    #[error("Backend panicked: {0}")]
    Panicked(String),
}

/// Errors surfaced by the command line front end
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The request was rejected before reaching the orchestrator
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Text carried by a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
