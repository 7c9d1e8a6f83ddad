/// In-memory PCM audio owned by the recording worker.
#[derive(Debug)]
pub struct AudioBuffer {
    /// PCM audio samples (16-bit mono, 16kHz).
    samples: Vec<i16>,
    /// Sample rate in Hz.
    sample_rate: u32,
    /// Number of channels (always 1 for our use case).
    channels: u16,
}

impl AudioBuffer {
    /// Create a new empty audio buffer.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels: 1,
        }
    }

    /// Create an audio buffer with pre-allocated capacity.
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            sample_rate,
            channels: 1,
        }
    }

    /// Append samples to the buffer.
    pub fn push_samples(&mut self, samples: &[i16]) {
        self.samples.extend_from_slice(samples);
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// A model-produced span of transcribed text covering a contiguous region of
/// speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment start, milliseconds from the beginning of the audio.
    pub start_ms: u64,
    /// Segment end, milliseconds from the beginning of the audio.
    pub end_ms: u64,
    /// Transcribed text for this segment.
    pub text: String,
}

/// Ordered transcription output.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Segments in production order.
    pub segments: Vec<Segment>,
    /// Detected language (ISO 639-1 code), if the model reported one.
    pub language: Option<String>,
}

impl Transcript {
    /// Segment texts joined with single spaces, in production order.
    ///
    /// Segment texts are trimmed first; segments that trim to nothing are
    /// skipped so the result never carries doubled spaces.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}
