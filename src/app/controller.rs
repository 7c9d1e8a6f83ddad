use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{CpalRecorder, LocalModelManager, TomlConfigStore, WhisperTranscriber};
use crate::domain::{AppConfig, AudioDevice, DomainError, DownloadProgress, Transcript};
use crate::infrastructure::init_logging;
use crate::ports::{
    AudioCapture, ConfigStore, ModelManager, RecordingSummary, TranscribeOptions, Transcriber,
};

/// Startup overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Alternate configuration file; the stored config is used when absent.
    pub config_path: Option<PathBuf>,
    /// Model ID override.
    pub model: Option<String>,
    /// Language override.
    pub language: Option<String>,
}

/// Application controller wiring configuration, logging and the adapters
/// behind the ports.
pub struct AppController {
    config: AppConfig,
    recorder: Arc<dyn AudioCapture>,
    transcriber: Arc<dyn Transcriber>,
    models: Arc<dyn ModelManager>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    pub fn new(options: &LaunchOptions) -> Result<Self, DomainError> {
        let store = TomlConfigStore::new()?;

        let mut config: AppConfig = match &options.config_path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|e| DomainError::Config(format!("{}: {}", path.display(), e)))?;
                toml::from_str(&content)?
            }
            None => store.load()?,
        };

        if let Some(model) = &options.model {
            config.transcription.model = model.clone();
        }
        if let Some(language) = &options.language {
            config.transcription.language = language.clone();
        }

        let log_guard = init_logging(
            &store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
        )?;

        info!("Voxnote starting up");

        let models = LocalModelManager::new(store.data_dir())?;
        let recorder = CpalRecorder::new(config.audio.clone());
        let transcriber = WhisperTranscriber::new(config.transcription.threads);

        Ok(Self {
            config,
            recorder: Arc::new(recorder),
            transcriber: Arc::new(transcriber),
            models: Arc::new(models),
            _log_guard: log_guard,
        })
    }

    /// Get the effective configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
        self.recorder.list_input_devices()
    }

    /// Resolve the configured model (downloading it if missing) and load it.
    pub async fn prepare_model(
        &self,
        progress: Option<Box<dyn Fn(DownloadProgress) + Send + Sync>>,
    ) -> Result<(), DomainError> {
        let path = self
            .models
            .resolve(&self.config.transcription.model, progress)
            .await?;
        self.transcriber.load_model(&path).await
    }

    /// Start recording from `device_index` into the configured WAV path.
    pub async fn start_recording(&self, device_index: usize) -> Result<(), DomainError> {
        self.recorder
            .start_recording(device_index, Path::new(&self.config.output.recording_path))
            .await
    }

    /// Stop recording and wait for the WAV file to be finalized.
    pub async fn stop_recording(&self) -> Result<RecordingSummary, DomainError> {
        self.recorder.stop_recording().await
    }

    /// Transcribe the recorded WAV file.
    pub async fn transcribe_recording(&self) -> Result<Transcript, DomainError> {
        let options = TranscribeOptions::from(&self.config.transcription);
        self.transcriber
            .transcribe_file(Path::new(&self.config.output.recording_path), &options)
            .await
    }

    /// Write the transcript to the configured log path, truncating it.
    pub fn write_transcript(&self, text: &str) -> Result<PathBuf, DomainError> {
        let path = PathBuf::from(&self.config.output.transcript_path);
        write_transcript(&path, text)?;
        Ok(path)
    }
}

/// Write transcript text to `path`, replacing any previous content.
pub fn write_transcript(path: &Path, text: &str) -> Result<(), DomainError> {
    fs::write(path, text)?;
    info!(path = ?path, chars = text.len(), "Transcript written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_transcript_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        write_transcript(&path, "a much longer first transcription").unwrap();
        write_transcript(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }
}
