use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{AudioConfig, AudioDevice, CaptureState, DomainError};

/// What a finished recording produced.
#[derive(Debug, Clone)]
pub struct RecordingSummary {
    /// Path of the finalized WAV file.
    pub path: PathBuf,
    /// Number of 16kHz mono samples written.
    pub samples: usize,
    /// Recorded duration in seconds.
    pub duration_secs: f32,
}

/// Port for audio capture operations.
///
/// Implementations own the capture worker: samples are buffered in memory
/// while recording and flushed to a WAV file when the recording stops.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// List available audio input devices in enumeration order.
    fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError>;

    /// Start recording from the device at `device_index` into `output`.
    ///
    /// The index is resolved when the stream is opened; an index that does
    /// not name a usable input device fails here. Returns an error if a
    /// recording is already active.
    async fn start_recording(&self, device_index: usize, output: &Path) -> Result<(), DomainError>;

    /// Stop the active recording, wait for the worker to flush the WAV file,
    /// and return what was written.
    async fn stop_recording(&self) -> Result<RecordingSummary, DomainError>;

    /// Get the current capture state.
    fn state(&self) -> CaptureState;

    /// Get the audio configuration.
    fn config(&self) -> AudioConfig;
}
