use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::adapters::{vad, wav_file};
use crate::domain::{DomainError, Segment, Transcript};
use crate::ports::{TranscribeOptions, Transcriber};

/// Transcriber implementation using whisper.cpp via whisper-rs.
pub struct WhisperTranscriber {
    context: RwLock<Option<Arc<WhisperContext>>>,
    threads: u32,
}

impl WhisperTranscriber {
    /// Create a new WhisperTranscriber.
    ///
    /// The `threads` parameter specifies the number of threads to use.
    /// 0 means auto-detect (cores - 1).
    pub fn new(threads: u32) -> Self {
        let actual_threads = if threads == 0 {
            std::thread::available_parallelism()
                .map(|p| std::cmp::max(1, p.get() as u32 - 1))
                .unwrap_or(1)
        } else {
            threads
        };

        info!(threads = actual_threads, "WhisperTranscriber created");

        Self {
            context: RwLock::new(None),
            threads: actual_threads,
        }
    }

    /// Convert i16 samples to f32 (whisper expects f32 samples in range [-1, 1]).
    fn convert_samples(samples: &[i16]) -> Vec<f32> {
        samples.iter().map(|&s| s as f32 / 32768.0).collect()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn load_model(&self, path: &Path) -> Result<(), DomainError> {
        if !path.exists() {
            return Err(DomainError::ModelNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        info!(path = ?path, "Loading whisper model");

        let path_str = path.to_string_lossy().to_string();

        // Load model in blocking task (I/O bound)
        let ctx = tokio::task::spawn_blocking(move || {
            WhisperContext::new_with_params(&path_str, WhisperContextParameters::default())
                .map_err(|e| DomainError::Model(format!("Failed to load model: {}", e)))
        })
        .await
        .map_err(|e| DomainError::Model(format!("Task join error: {}", e)))??;

        *self.context.write() = Some(Arc::new(ctx));

        info!(path = ?path, "Whisper model loaded");
        Ok(())
    }

    fn is_model_loaded(&self) -> bool {
        self.context.read().is_some()
    }

    async fn transcribe_file(
        &self,
        path: &Path,
        options: &TranscribeOptions,
    ) -> Result<Transcript, DomainError> {
        let context = self.context.read().clone();
        let ctx = context.ok_or_else(|| DomainError::Transcription("No model loaded".to_string()))?;

        let audio = wav_file::read_wav(path)?;
        if audio.sample_rate() != 16_000 {
            return Err(DomainError::Audio(format!(
                "Expected 16kHz audio, got {}Hz",
                audio.sample_rate()
            )));
        }

        if audio.is_empty() {
            return Ok(Transcript::default());
        }

        debug!(
            path = ?path,
            samples = audio.len(),
            duration_secs = audio.duration_secs(),
            "Starting transcription"
        );

        let start = std::time::Instant::now();

        let threads = if options.threads > 0 {
            options.threads
        } else {
            self.threads
        };
        let options = options.clone();
        let sample_rate = audio.sample_rate();

        // Run VAD filtering and inference in a blocking task (CPU-bound)
        let transcript = tokio::task::spawn_blocking(move || {
            let samples = if options.vad_enabled {
                vad::filter_silence(audio.samples(), sample_rate, options.min_silence_ms)?
            } else {
                audio.samples().to_vec()
            };

            if samples.is_empty() {
                debug!("No speech detected, skipping inference");
                return Ok(Transcript::default());
            }

            let samples = Self::convert_samples(&samples);

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_n_threads(threads as i32);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            // Set language if specified, otherwise auto-detect
            if let Some(ref lang) = options.language {
                params.set_language(Some(lang));
            }

            // Suppress silence and non-speech tokens the decoder still sees
            if options.vad_enabled {
                params.set_no_speech_thold(options.no_speech_threshold);
                params.set_entropy_thold(options.entropy_threshold);
                params.set_suppress_non_speech_tokens(true);
            }

            // Create state for this transcription
            let mut state = ctx.create_state().map_err(|e| {
                DomainError::Transcription(format!("Failed to create whisper state: {}", e))
            })?;

            // Run inference
            state.full(params, &samples).map_err(|e| {
                DomainError::Transcription(format!("Transcription failed: {}", e))
            })?;

            // Collect segments in production order
            let num_segments = state.full_n_segments().map_err(|e| {
                DomainError::Transcription(format!("Failed to get segment count: {}", e))
            })?;

            let mut segments = Vec::with_capacity(num_segments as usize);
            for i in 0..num_segments {
                if let Ok(text) = state.full_get_segment_text(i) {
                    // Timestamps are reported in 10ms ticks
                    let start_ms = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
                    let end_ms = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;
                    segments.push(Segment {
                        start_ms,
                        end_ms,
                        text: text.trim().to_string(),
                    });
                }
            }

            // Get detected language (if available)
            let language = state
                .full_lang_id_from_state()
                .ok()
                .and_then(|id| whisper_rs::get_lang_str(id).map(|s| s.to_string()));

            Ok::<Transcript, DomainError>(Transcript { segments, language })
        })
        .await
        .map_err(|e| DomainError::Transcription(format!("Task join error: {}", e)))??;

        info!(
            segments = transcript.segments.len(),
            detected_language = ?transcript.language,
            duration_ms = start.elapsed().as_millis() as u64,
            "Transcription complete"
        );

        Ok(transcript)
    }
}
