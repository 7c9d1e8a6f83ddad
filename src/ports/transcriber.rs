use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::TranscriptionConfig;
use crate::domain::{DomainError, Transcript};

/// Per-call transcription options.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Target language (ISO 639-1 code). None for auto-detection.
    pub language: Option<String>,
    /// Filter silence out of the audio before inference.
    pub vad_enabled: bool,
    /// Silence gaps shorter than this survive the filter.
    pub min_silence_ms: u64,
    /// No-speech probability threshold passed to the model.
    pub no_speech_threshold: f32,
    /// Entropy threshold passed to the model.
    pub entropy_threshold: f32,
    /// Number of threads to use (0 = auto).
    pub threads: u32,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self::from(&TranscriptionConfig::default())
    }
}

impl From<&TranscriptionConfig> for TranscribeOptions {
    fn from(config: &TranscriptionConfig) -> Self {
        let language = match config.language.as_str() {
            "" | "auto" => None,
            lang => Some(lang.to_string()),
        };
        Self {
            language,
            vad_enabled: config.vad_enabled,
            min_silence_ms: config.min_silence_ms,
            no_speech_threshold: config.no_speech_threshold,
            entropy_threshold: config.entropy_threshold,
            threads: config.threads,
        }
    }
}

/// Port for transcription operations.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Load a model from the specified path.
    async fn load_model(&self, path: &Path) -> Result<(), DomainError>;

    /// Check if a model is currently loaded.
    fn is_model_loaded(&self) -> bool;

    /// Transcribe a WAV file (mono, 16-bit, 16kHz) to an ordered transcript.
    ///
    /// An all-silence file yields an empty transcript, not an error.
    async fn transcribe_file(
        &self,
        path: &Path,
        options: &TranscribeOptions,
    ) -> Result<Transcript, DomainError>;
}
