use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Audio capture state machine.
///
/// State transitions:
/// - Idle -> Recording (start_recording)
/// - Recording -> Idle (stop_recording, finalizes the WAV file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CaptureState {
    /// Ready to record, no active capture.
    Idle = 0,
    /// Actively capturing audio.
    Recording = 1,
}

impl CaptureState {
    #[must_use]
    pub fn can_start_recording(&self) -> bool {
        matches!(self, CaptureState::Idle)
    }

    #[must_use]
    pub fn can_stop_recording(&self) -> bool {
        matches!(self, CaptureState::Recording)
    }
}

impl From<u8> for CaptureState {
    fn from(value: u8) -> Self {
        match value {
            1 => CaptureState::Recording,
            _ => CaptureState::Idle,
        }
    }
}

impl From<CaptureState> for u8 {
    fn from(state: CaptureState) -> Self {
        state as u8
    }
}

/// Atomic wrapper for CaptureState for lock-free reads.
#[derive(Debug)]
pub struct AtomicCaptureState(AtomicU8);

impl AtomicCaptureState {
    pub fn new(state: CaptureState) -> Self {
        Self(AtomicU8::new(state.into()))
    }

    pub fn load(&self) -> CaptureState {
        self.0.load(Ordering::Acquire).into()
    }

    pub fn store(&self, state: CaptureState) {
        self.0.store(state.into(), Ordering::Release);
    }
}

impl Default for AtomicCaptureState {
    fn default() -> Self {
        Self::new(CaptureState::Idle)
    }
}

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Target sample rate in Hz.
    pub sample_rate: u32,
    /// Samples drained from the capture ring per worker iteration.
    pub chunk_frames: u32,
    /// Capacity of the callback-to-worker transfer ring, in seconds.
    pub ring_secs: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000, // 16kHz for Whisper
            chunk_frames: 1024,
            ring_secs: 4,
        }
    }
}

impl AudioConfig {
    /// Transfer ring capacity in samples.
    pub fn ring_capacity(&self) -> usize {
        self.ring_secs as usize * self.sample_rate as usize
    }

    /// Duration of one drain chunk.
    pub fn chunk_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.chunk_frames) * 1000 / u64::from(self.sample_rate))
    }
}

/// Input audio device information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Position in the input device enumeration.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Input channel count of the device's default configuration.
    pub input_channels: u16,
    /// Whether this is the system default input device.
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_state_transitions() {
        assert!(CaptureState::Idle.can_start_recording());
        assert!(!CaptureState::Recording.can_start_recording());
        assert!(!CaptureState::Idle.can_stop_recording());
        assert!(CaptureState::Recording.can_stop_recording());
    }

    #[test]
    fn test_capture_state_roundtrip() {
        for state in [CaptureState::Idle, CaptureState::Recording] {
            let value: u8 = state.into();
            let recovered: CaptureState = value.into();
            assert_eq!(state, recovered);
        }
    }

    #[test]
    fn test_atomic_capture_state() {
        let atomic = AtomicCaptureState::default();
        assert_eq!(atomic.load(), CaptureState::Idle);

        atomic.store(CaptureState::Recording);
        assert_eq!(atomic.load(), CaptureState::Recording);
    }

    #[test]
    fn test_audio_config_default() {
        let config = AudioConfig::default();
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.chunk_frames, 1024);
        // 4 seconds * 16000 samples/sec
        assert_eq!(config.ring_capacity(), 64_000);
        assert_eq!(config.chunk_duration().as_millis(), 64);
    }
}
