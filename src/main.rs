// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use serde_json::json;
use std::io::Write;

use altrans::app_config::{Config, LogLevel};
use altrans::errors::AppError;
use altrans::translation::{Evaluator, TranslationOrchestrator};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a piece of text and print the scored result as JSON
    Translate {
        /// Text to translate
        #[arg(short = 'x', long)]
        text: String,

        /// Target language code (unsupported codes use the configured default)
        #[arg(short, long)]
        target: Option<String>,

        /// Skip preloading the configured backends
        #[arg(long)]
        no_preload: bool,
    },

    /// List supported target languages
    Languages,

    /// Show discovered and loaded backends
    Models,

    /// Score a hypothesis against a reference
    Evaluate {
        /// Candidate translation
        #[arg(long)]
        hypothesis: String,

        /// Reference translation
        #[arg(long)]
        reference: String,
    },

    /// Generate shell completions for altrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// altrans - Adaptive Language Translation
///
/// Translates text through discovered neural backends, falling back to a
/// phrase dictionary, and scores every result.
#[derive(Parser, Debug)]
#[command(name = "altrans")]
#[command(version)]
#[command(about = "Backend-routing text translator with quality scoring")]
#[command(long_about = "altrans routes each translation through a neural backend when one is available for the
language pair, retries short inputs once, and falls back to a phrase dictionary otherwise.
Every result carries BLEU, ROUGE and METEOR scores.

EXAMPLES:
    altrans translate --text \"Good morning\" --target ja
    altrans translate -x \"Where is the station?\" -t th --log-level debug
    altrans languages
    altrans models
    altrans evaluate --hypothesis \"the cat sat\" --reference \"the cat sat down\"
    altrans completions bash > altrans.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Most verbose level the logger accepts; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "altrans", &mut std::io::stdout());
            Ok(())
        }
        Commands::Evaluate { hypothesis, reference } => {
            let metrics = Evaluator::new().score(&hypothesis, &reference);
            print_json(&json!({
                "metrics": {
                    "bleu": metrics.bleu,
                    "rouge": metrics.rouge,
                    "meteor": metrics.meteor,
                    "quality": metrics.quality(),
                },
                "percentages": metrics.percentages(),
            }))
        }
        Commands::Translate { text, target, no_preload } => {
            let orchestrator = build_orchestrator(&cli.config_path, cli.log_level.is_some())?;
            run_translate(&orchestrator, &text, target.as_deref(), !no_preload).await
        }
        Commands::Languages => {
            let orchestrator = build_orchestrator(&cli.config_path, cli.log_level.is_some())?;
            print_json(&json!({ "languages": orchestrator.available_languages() }))
        }
        Commands::Models => {
            let orchestrator = build_orchestrator(&cli.config_path, cli.log_level.is_some())?;
            print_json(&serde_json::to_value(orchestrator.model_info())?)
        }
    }
}

fn build_orchestrator(config_path: &str, log_level_overridden: bool) -> Result<TranslationOrchestrator, AppError> {
    let config = Config::load_or_create(config_path).map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // Validate the configuration after loading
    config
        .validate()
        .map_err(|e| AppError::Config(format!("validation failed: {:#}", e)))?;

    if !log_level_overridden {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(TranslationOrchestrator::from_config(config)?)
}

async fn run_translate(
    orchestrator: &TranslationOrchestrator,
    text: &str,
    target: Option<&str>,
    preload: bool,
) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput("text to translate must not be empty".to_string()).into());
    }

    if preload {
        if let Some(pair) = orchestrator.preload().await {
            info!("Ready with preloaded backend {}", pair);
        }
    }

    let target = target.unwrap_or(orchestrator.config().default_target_language.as_str());
    let result = orchestrator.translate(text, target).await;
    let metrics = result.metrics;

    print_json(&json!({
        "translatedText": result.translated_text,
        "targetLanguage": result.target_language,
        "outcome": result.source,
        "metrics": {
            "bleu": metrics.bleu,
            "rouge": metrics.rouge,
            "meteor": metrics.meteor,
            "quality": metrics.quality(),
        },
        "percentages": metrics.percentages(),
    }))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
