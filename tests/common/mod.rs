/*!
 * Common test utilities for the altrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use altrans::app_config::Config;
use altrans::backends::mock::MockLoader;
use altrans::translation::TranslationOrchestrator;
use altrans::translation::registry::{CONFIG_ARTIFACT, METADATA_FILE, WEIGHTS_ARTIFACT};

/// Route library logs to the test output once per process
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Temporary model root with helpers to lay out pair directories
pub struct ModelRoot {
    dir: TempDir,
}

impl ModelRoot {
    pub fn new() -> Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a complete pair directory with weights and configuration
    pub fn add_pair(&self, name: &str) -> Result<PathBuf> {
        let dir = self.add_dir(name)?;
        fs::write(dir.join(WEIGHTS_ARTIFACT), b"weights")?;
        fs::write(dir.join(CONFIG_ARTIFACT), r#"{"model_type": "mbart"}"#)?;
        Ok(dir)
    }

    /// Create a pair directory holding only the weights artifact
    pub fn add_weights_only(&self, name: &str) -> Result<PathBuf> {
        let dir = self.add_dir(name)?;
        fs::write(dir.join(WEIGHTS_ARTIFACT), b"weights")?;
        Ok(dir)
    }

    /// Create a pair directory holding only the configuration artifact
    pub fn add_config_only(&self, name: &str) -> Result<PathBuf> {
        let dir = self.add_dir(name)?;
        fs::write(dir.join(CONFIG_ARTIFACT), "{}")?;
        Ok(dir)
    }

    /// Write the optional metadata file of a pair directory
    pub fn write_metadata(&self, name: &str, content: &str) -> Result<()> {
        let dir = self.add_dir(name)?;
        fs::write(dir.join(METADATA_FILE), content)?;
        Ok(())
    }

    fn add_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.path().join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Default configuration pointed at `root`
pub fn test_config(root: &Path) -> Config {
    Config {
        model_root: root.to_path_buf(),
        ..Config::default()
    }
}

/// Orchestrator over `root` whose backends come from `loader`
pub fn orchestrator_with(root: &ModelRoot, loader: &MockLoader) -> TranslationOrchestrator {
    init_logging();
    TranslationOrchestrator::new(test_config(root.path()), Arc::new(loader.clone()))
}

/// `count` words without sentence punctuation, cycling through a small vocabulary
pub fn long_text(count: usize) -> String {
    const VOCABULARY: [&str; 8] = ["hello", "river", "thank", "you", "mountain", "good", "morning", "lantern"];
    (0..count)
        .map(|i| VOCABULARY[i % VOCABULARY.len()])
        .collect::<Vec<_>>()
        .join(" ")
}
