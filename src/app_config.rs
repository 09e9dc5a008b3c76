use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::backends::DeviceAffinity;
use crate::language_utils;
use crate::translation::quality::TranslationMetrics;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code of every backend
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target used when a request names an unsupported language
    #[serde(default = "default_target_language")]
    pub default_target_language: String,

    /// Directory holding one subdirectory per language pair
    #[serde(default = "default_model_root")]
    pub model_root: PathBuf,

    /// Device backends are placed on
    #[serde(default)]
    pub device: DeviceAffinity,

    /// External backend command (program followed by arguments)
    ///
    /// When absent every request is served by the fallback translator.
    #[serde(default)]
    pub backend_command: Option<Vec<String>>,

    /// Pairs tried in order by `preload`, stopping at the first success
    #[serde(default = "default_preload_pairs")]
    pub preload_pairs: Vec<String>,

    /// Decoding parameters
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Metrics reported for fallback and error results
    #[serde(default = "default_fallback_metrics")]
    pub fallback_metrics: TranslationMetrics,

    /// Delay applied before each generation
    #[serde(default)]
    pub delay: DelayConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Decoding configuration for the primary attempt and the retry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Lower bound of the output length budget
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Upper bound of the output length budget
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Output tokens budgeted per input word
    #[serde(default = "default_length_per_token")]
    pub length_per_token: usize,

    #[serde(default = "default_num_beams")]
    pub num_beams: usize,

    #[serde(default = "default_length_penalty")]
    pub length_penalty: f64,

    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Beam width of the deterministic retry
    #[serde(default = "default_retry_num_beams")]
    pub retry_num_beams: usize,

    #[serde(default = "default_retry_temperature")]
    pub retry_temperature: f64,

    #[serde(default = "default_retry_max_length")]
    pub retry_max_length: usize,

    /// Inputs with at most this many words are retried once
    #[serde(default = "default_retry_word_limit")]
    pub retry_word_limit: usize,

    /// Outputs shorter than this many characters are invalid
    #[serde(default = "default_min_output_chars")]
    pub min_output_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            length_per_token: default_length_per_token(),
            num_beams: default_num_beams(),
            length_penalty: default_length_penalty(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            retry_num_beams: default_retry_num_beams(),
            retry_temperature: default_retry_temperature(),
            retry_max_length: default_retry_max_length(),
            retry_word_limit: default_retry_word_limit(),
            min_output_chars: default_min_output_chars(),
        }
    }
}

impl GenerationConfig {
    /// Length budget for an input of `word_count` words
    pub fn length_budget(&self, word_count: usize) -> usize {
        word_count
            .saturating_mul(self.length_per_token)
            .max(self.min_length)
            .min(self.max_length)
    }
}

/// Delay strategy selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DelayConfig {
    #[default]
    None,
    Fixed {
        millis: u64,
    },
    Scaled {
        #[serde(default = "default_delay_base_millis")]
        base_millis: u64,
        #[serde(default = "default_delay_per_char_millis")]
        per_char_millis: u64,
        #[serde(default = "default_delay_max_millis")]
        max_millis: u64,
    },
    Jitter {
        min_millis: u64,
        max_millis: u64,
        #[serde(default)]
        seed: u64,
    },
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    language_utils::DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_model_root() -> PathBuf {
    PathBuf::from("./mbart-finetuned")
}

fn default_preload_pairs() -> Vec<String> {
    vec!["en-ja".to_string(), "en-zh".to_string(), "en-hi".to_string()]
}

fn default_fallback_metrics() -> TranslationMetrics {
    TranslationMetrics::new(0.45, 0.52, 0.38)
}

fn default_min_length() -> usize {
    64
}

fn default_max_length() -> usize {
    512
}

fn default_length_per_token() -> usize {
    3
}

fn default_num_beams() -> usize {
    5
}

fn default_length_penalty() -> f64 {
    1.2
}

fn default_no_repeat_ngram_size() -> usize {
    3
}

fn default_temperature() -> f64 {
    1.0
}

fn default_top_k() -> usize {
    50
}

fn default_retry_num_beams() -> usize {
    3
}

fn default_retry_temperature() -> f64 {
    0.9
}

fn default_retry_max_length() -> usize {
    64
}

fn default_retry_word_limit() -> usize {
    5
}

fn default_min_output_chars() -> usize {
    2
}

fn default_delay_base_millis() -> u64 {
    300
}

fn default_delay_per_char_millis() -> u64 {
    5
}

fn default_delay_max_millis() -> u64 {
    1500
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = language_utils::get_language_name(&self.source_language)?;
        let _target_name = language_utils::get_language_name(&self.default_target_language)?;

        if !self.fallback_metrics.is_within_bounds() {
            return Err(anyhow!("Fallback metrics must lie in [0, 1]"));
        }

        let generation = &self.generation;
        if generation.min_length > generation.max_length {
            return Err(anyhow!(
                "generation.min_length ({}) exceeds generation.max_length ({})",
                generation.min_length,
                generation.max_length
            ));
        }
        if generation.num_beams == 0 || generation.retry_num_beams == 0 {
            return Err(anyhow!("Beam widths must be at least 1"));
        }

        if let Some(command) = &self.backend_command {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(anyhow!("backend_command must start with a program name"));
            }
        }

        Ok(())
    }

    /// Load configuration from `path`, writing a default file when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load configuration from an existing JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            default_target_language: default_target_language(),
            model_root: default_model_root(),
            device: DeviceAffinity::default(),
            backend_command: None,
            preload_pairs: default_preload_pairs(),
            generation: GenerationConfig::default(),
            fallback_metrics: default_fallback_metrics(),
            delay: DelayConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
