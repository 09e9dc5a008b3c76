/*!
 * Backend discovery.
 *
 * The model root holds one subdirectory per language pair, named
 * `{source}-{target}`. A directory is a usable backend only when it has both
 * the weights artifact and the configuration artifact. An optional metadata
 * file is read for diagnostics and never affects discovery.
 *
 * Discovery produces an immutable `RegistrySnapshot`; rescanning is an
 * explicit call.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::language_utils::normalize_code;

/// Required weights file inside a pair directory
pub const WEIGHTS_ARTIFACT: &str = "pytorch_model.bin";

/// Required configuration file inside a pair directory
pub const CONFIG_ARTIFACT: &str = "config.json";

/// Optional metadata file inside a pair directory
pub const METADATA_FILE: &str = "model_info.json";

/// Ordered `(source, target)` language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PairKey {
    pub source: String,
    pub target: String,
}

impl PairKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: normalize_code(source),
            target: normalize_code(target),
        }
    }

    /// Parse a `{source}-{target}` directory name
    pub fn parse(name: &str) -> Option<Self> {
        let (source, target) = name.split_once('-')?;
        if source.trim().is_empty() || target.trim().is_empty() {
            return None;
        }
        Some(Self::new(source, target))
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Free-form diagnostic metadata shipped next to a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub source_language_name: Option<String>,
    #[serde(default)]
    pub target_language_name: Option<String>,
    #[serde(default)]
    pub training_examples: Option<u64>,
    /// Any other fields, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A discovered, loadable backend
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePairDescriptor {
    pub source_language: String,
    pub target_language: String,
    /// Directory holding the backend artifacts
    pub storage_path: PathBuf,
    pub metadata: Option<ModelMetadata>,
}

impl LanguagePairDescriptor {
    pub fn new(
        source_language: &str,
        target_language: &str,
        storage_path: PathBuf,
        metadata: Option<ModelMetadata>,
    ) -> Self {
        Self {
            source_language: normalize_code(source_language),
            target_language: normalize_code(target_language),
            storage_path,
            metadata,
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.source_language, &self.target_language)
    }

    /// Pair key rendered as `{source}-{target}`
    pub fn key(&self) -> String {
        self.pair_key().to_string()
    }
}

/// Immutable result of one discovery pass
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    root: PathBuf,
    pairs: BTreeMap<PairKey, LanguagePairDescriptor>,
}

impl RegistrySnapshot {
    /// Build a snapshot from already-known descriptors
    pub fn from_descriptors<I>(root: impl Into<PathBuf>, descriptors: I) -> Self
    where
        I: IntoIterator<Item = LanguagePairDescriptor>,
    {
        let pairs = descriptors.into_iter().map(|d| (d.pair_key(), d)).collect();
        Self {
            root: root.into(),
            pairs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Descriptor for a pair, if one was discovered
    pub fn get(&self, source: &str, target: &str) -> Option<&LanguagePairDescriptor> {
        self.pairs.get(&PairKey::new(source, target))
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.get(source, target).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.pairs.keys().map(|k| k.to_string()).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &LanguagePairDescriptor> {
        self.pairs.values()
    }
}

/// Scan the immediate subdirectories of `storage_root` for usable backends
pub fn discover(storage_root: &Path) -> RegistrySnapshot {
    if !storage_root.is_dir() {
        warn!("Model directory not found: {}", storage_root.display());
        return RegistrySnapshot::from_descriptors(storage_root, Vec::new());
    }

    let descriptors: Vec<LanguagePairDescriptor> = WalkDir::new(storage_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| inspect_directory(e.path()))
        .collect();

    info!(
        "Discovered {} backend(s) under {}",
        descriptors.len(),
        storage_root.display()
    );
    RegistrySnapshot::from_descriptors(storage_root, descriptors)
}

fn inspect_directory(path: &Path) -> Option<LanguagePairDescriptor> {
    let name = path.file_name()?.to_string_lossy();
    let Some(key) = PairKey::parse(&name) else {
        debug!("Skipping {}: not a language pair directory", path.display());
        return None;
    };

    if !path.join(WEIGHTS_ARTIFACT).is_file() || !path.join(CONFIG_ARTIFACT).is_file() {
        debug!("Skipping {}: missing backend artifacts", path.display());
        return None;
    }

    let metadata = read_metadata(&key, path);
    info!("Found backend for {}", key);
    Some(LanguagePairDescriptor::new(
        &key.source,
        &key.target,
        path.to_path_buf(),
        metadata,
    ))
}

fn read_metadata(key: &PairKey, dir: &Path) -> Option<ModelMetadata> {
    let path = dir.join(METADATA_FILE);
    if !path.is_file() {
        return None;
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<ModelMetadata>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(metadata) => {
            info!(
                "  {}: {} -> {} ({} training examples)",
                key,
                metadata.source_language_name.as_deref().unwrap_or("unknown"),
                metadata.target_language_name.as_deref().unwrap_or("unknown"),
                metadata
                    .training_examples
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
            Some(metadata)
        }
        Err(e) => {
            warn!("Ignoring unreadable metadata {}: {}", path.display(), e);
            None
        }
    }
}
