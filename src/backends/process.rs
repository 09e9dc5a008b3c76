/*!
 * External-process backend.
 *
 * Each generation spawns the configured command with the model directory,
 * language pair and decoding parameters as arguments. The source text is
 * written to the child's stdin and the translation is read from stdout.
 */

use async_trait::async_trait;
use log::{debug, error, info};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::backends::{Backend, BackendLoader, DeviceAffinity, GenerationRequest};
use crate::errors::BackendError;
use crate::translation::registry::{CONFIG_ARTIFACT, LanguagePairDescriptor};

/// Loader that validates a pair directory and wraps it in a `ProcessBackend`
#[derive(Debug, Clone)]
pub struct ProcessBackendLoader {
    program: String,
    args: Vec<String>,
}

impl ProcessBackendLoader {
    /// Create a loader from a command line (program followed by arguments)
    pub fn new(command: &[String]) -> Result<Self, BackendError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| BackendError::InvalidConfig("backend command is empty".to_string()))?;
        if program.trim().is_empty() {
            return Err(BackendError::InvalidConfig("backend program is blank".to_string()));
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl BackendLoader for ProcessBackendLoader {
    async fn load(
        &self,
        descriptor: &LanguagePairDescriptor,
        device: DeviceAffinity,
    ) -> Result<Arc<dyn Backend>, BackendError> {
        let config_path = descriptor.storage_path.join(CONFIG_ARTIFACT);
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| BackendError::LoadFailed {
                pair: descriptor.key(),
                message: format!("cannot read {}: {}", config_path.display(), e),
            })?;

        let config: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| BackendError::InvalidConfig(format!("{}: {}", config_path.display(), e)))?;
        if !config.is_object() {
            return Err(BackendError::InvalidConfig(format!(
                "{}: expected a JSON object",
                config_path.display()
            )));
        }

        info!(
            "Prepared process backend '{}' for {} on {}",
            self.program,
            descriptor.key(),
            device
        );

        Ok(Arc::new(ProcessBackend {
            program: self.program.clone(),
            args: self.args.clone(),
            model_dir: descriptor.storage_path.clone(),
            device,
        }))
    }
}

/// Backend that runs one child process per generation
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: String,
    args: Vec<String>,
    model_dir: PathBuf,
    device: DeviceAffinity,
}

impl ProcessBackend {
    fn command_args(&self, request: &GenerationRequest) -> Vec<String> {
        let params = &request.params;
        let mut args = self.args.clone();
        args.extend([
            "--model-dir".to_string(),
            self.model_dir.display().to_string(),
            "--device".to_string(),
            self.device.to_string(),
            "--source-lang".to_string(),
            request.source_language.clone(),
            "--target-lang".to_string(),
            request.target_language.clone(),
            "--forced-bos-token".to_string(),
            request.forced_token.clone(),
            "--max-length".to_string(),
            params.max_length.to_string(),
            "--num-beams".to_string(),
            params.num_beams.to_string(),
            "--length-penalty".to_string(),
            params.length_penalty.to_string(),
            "--no-repeat-ngram-size".to_string(),
            params.no_repeat_ngram_size.to_string(),
            "--temperature".to_string(),
            params.temperature.to_string(),
            "--top-k".to_string(),
            params.top_k.to_string(),
            "--do-sample".to_string(),
            params.do_sample.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl Backend for ProcessBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        debug!(
            "Spawning '{}' for {}-{} ({} chars)",
            self.program,
            request.source_language,
            request.target_language,
            request.text.len()
        );

        let mut child = Command::new(&self.program)
            .args(self.command_args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BackendError::Generation(format!("failed to spawn '{}': {}", self.program, e)))?;

        // stdin is written while stdout drains so a streaming child never stalls on a full pipe
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(request.text.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        // A child that exits without reading stdin is reported through its exit status
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(BackendError::Generation(format!("failed to write to backend: {}", e)));
            }
            debug!("Backend closed stdin early: {}", e);
        }

        let output = output.map_err(|e| BackendError::Generation(format!("backend process failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Backend process exited with {}: {}", output.status, stderr.trim());
            return Err(BackendError::Generation(format!(
                "backend exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
