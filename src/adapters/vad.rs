use std::ops::Range;

use tracing::debug;
use webrtc_vad::{SampleRate, Vad, VadMode};

use crate::domain::DomainError;

/// WebRTC VAD supports only 10/20/30ms frames. Use 30ms to reduce overhead.
const FRAME_MS: u64 = 30;

/// Remove silence from `samples`, keeping gaps shorter than `min_silence_ms`.
///
/// Frames are classified with the WebRTC voice activity detector; speech
/// regions separated by less than the minimum silence duration are merged so
/// natural pauses inside a sentence survive. Returns an empty vector when no
/// speech is detected at all. Input shorter than one VAD frame is returned
/// unchanged.
pub fn filter_silence(
    samples: &[i16],
    sample_rate: u32,
    min_silence_ms: u64,
) -> Result<Vec<i16>, DomainError> {
    let frame_len = (sample_rate as u64 * FRAME_MS / 1000) as usize;
    if frame_len == 0 {
        return Err(DomainError::Audio(format!(
            "Unsupported sample rate {}Hz",
            sample_rate
        )));
    }
    if samples.len() < frame_len {
        return Ok(samples.to_vec());
    }

    let flags = classify_frames(samples, sample_rate, frame_len)?;
    let min_silence_frames = (min_silence_ms / FRAME_MS).max(1) as usize;
    let spans = keep_spans(&flags, min_silence_frames);

    let mut kept = Vec::new();
    for span in &spans {
        let start = span.start * frame_len;
        let end = (span.end * frame_len).min(samples.len());
        kept.extend_from_slice(&samples[start..end]);
    }

    debug!(
        total_frames = flags.len(),
        speech_frames = flags.iter().filter(|&&f| f).count(),
        kept_samples = kept.len(),
        min_silence_ms,
        "Silence filter applied"
    );

    Ok(kept)
}

/// Classify each 30ms frame as speech or silence.
///
/// The trailing partial frame cannot be classified and inherits the flag of
/// the last full frame so a clipped word tail is not dropped.
fn classify_frames(
    samples: &[i16],
    sample_rate: u32,
    frame_len: usize,
) -> Result<Vec<bool>, DomainError> {
    let rate = SampleRate::try_from(sample_rate as i32)
        .map_err(|_| DomainError::Audio(format!("Unsupported sample rate {}Hz", sample_rate)))?;

    // Aggressive mode minimizes false positives on non-speech noise.
    let mut vad = Vad::new_with_rate_and_mode(rate, VadMode::VeryAggressive);

    let mut flags: Vec<bool> = samples
        .chunks_exact(frame_len)
        .map(|frame| vad.is_voice_segment(frame).unwrap_or(false))
        .collect();

    if samples.len() % frame_len != 0 {
        let tail = flags.last().copied().unwrap_or(false);
        flags.push(tail);
    }

    Ok(flags)
}

/// Merge speech frames into kept ranges.
///
/// Silence runs shorter than `min_silence_frames` between two speech frames
/// are kept; leading and trailing silence is always removed.
fn keep_spans(flags: &[bool], min_silence_frames: usize) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for (i, &is_speech) in flags.iter().enumerate() {
        if !is_speech {
            continue;
        }
        match spans.last_mut() {
            Some(last) if i - last.end < min_silence_frames => last.end = i + 1,
            _ => spans.push(i..i + 1),
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn test_keep_spans_merges_short_gaps() {
        // Gap of 2 frames < threshold of 3: one merged span including the gap.
        let spans = keep_spans(&[T, T, F, F, T], 3);
        assert_eq!(spans, vec![0..5]);
    }

    #[test]
    fn test_keep_spans_splits_on_long_gaps() {
        // Gap of 2 frames >= threshold of 2: silence removed.
        let spans = keep_spans(&[T, T, F, F, T], 2);
        assert_eq!(spans, vec![0..2, 4..5]);
    }

    #[test]
    fn test_keep_spans_drops_edge_silence() {
        let spans = keep_spans(&[F, F, T, T, F], 10);
        assert_eq!(spans, vec![2..4]);
    }

    #[test]
    fn test_keep_spans_all_silence() {
        assert!(keep_spans(&[F, F, F], 1).is_empty());
        assert!(keep_spans(&[], 1).is_empty());
    }

    #[test]
    fn test_filter_silence_on_digital_silence() {
        // One second of zeroed samples carries no speech.
        let samples = vec![0i16; 16_000];
        let kept = filter_silence(&samples, 16_000, 300).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_filter_silence_short_input_passthrough() {
        // Shorter than one 30ms frame: returned unchanged.
        let samples = vec![5i16; 100];
        let kept = filter_silence(&samples, 16_000, 300).unwrap();
        assert_eq!(kept, samples);
    }
}
