use serde::{Deserialize, Serialize};

use crate::domain::audio::AudioConfig;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
        }
    }
}

/// Transcription configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Selected model ID from the catalog.
    pub model: String,
    /// Language code (e.g., "en", "fr", "auto").
    pub language: String,
    /// Enable voice activity filtering before inference.
    pub vad_enabled: bool,
    /// Silence gaps shorter than this survive the VAD filter.
    pub min_silence_ms: u64,
    /// No-speech probability threshold (0.0-1.0).
    /// Default 0.6 from whisper.cpp recommendations.
    pub no_speech_threshold: f32,
    /// Entropy threshold for detecting non-speech.
    /// Default 2.4 from whisper.cpp recommendations.
    pub entropy_threshold: f32,
    /// Number of inference threads (0 = auto).
    pub threads: u32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "medium".to_string(),
            language: "auto".to_string(),
            vad_enabled: true,
            min_silence_ms: 300,
            no_speech_threshold: 0.6,
            entropy_threshold: 2.4,
            threads: 0,
        }
    }
}

/// Output file configuration. Relative paths resolve against the working
/// directory; both files are truncated on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the recorded WAV file.
    pub recording_path: String,
    /// Path of the plain-text transcript log.
    pub transcript_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            recording_path: "continuous_recording.wav".to_string(),
            transcript_path: "log.txt".to_string(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub transcription: TranscriptionConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_recording_flow() {
        let config = AppConfig::new();
        assert_eq!(config.audio.sample_rate, 16_000);
        assert_eq!(config.transcription.model, "medium");
        assert!(config.transcription.vad_enabled);
        assert_eq!(config.transcription.min_silence_ms, 300);
        assert_eq!(config.output.recording_path, "continuous_recording.wav");
        assert_eq!(config.output.transcript_path, "log.txt");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [transcription]
            model = "tiny"
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.transcription.model, "tiny");
        assert_eq!(config.transcription.language, "en");
        // Untouched sections keep their defaults
        assert_eq!(config.transcription.min_silence_ms, 300);
        assert_eq!(config.audio.chunk_frames, 1024);
        assert_eq!(config.output.transcript_path, "log.txt");
    }
}
