use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::info;

use crate::domain::{AudioBuffer, DomainError};

/// WAV spec for recordings: mono, 16-bit signed PCM.
pub fn recording_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write samples to `path` as a mono 16-bit WAV file.
///
/// An existing file at `path` is truncated.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), DomainError> {
    let mut writer = WavWriter::create(path, recording_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!(path = ?path, samples = samples.len(), "WAV file written");
    Ok(())
}

/// Read a WAV file into an audio buffer, validating mono 16-bit PCM.
pub fn read_wav(path: &Path) -> Result<AudioBuffer, DomainError> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(DomainError::Audio(format!(
            "Expected mono audio, got {} channels",
            spec.channels
        )));
    }
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(DomainError::Audio(format!(
            "Expected 16-bit PCM audio, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    let mut buffer = AudioBuffer::with_capacity(spec.sample_rate, samples.len());
    buffer.push_samples(&samples);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_preserves_spec_and_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let samples: Vec<i16> = (0..4096).map(|i| (i % 256) as i16).collect();

        write_wav(&path, &samples, 16_000).unwrap();

        let spec = WavReader::open(&path).unwrap().spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 16_000);

        let buffer = read_wav(&path).unwrap();
        assert_eq!(buffer.samples(), samples.as_slice());
        assert_eq!(buffer.sample_rate(), 16_000);
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("take.wav");

        write_wav(&path, &vec![7i16; 32_000], 16_000).unwrap();
        write_wav(&path, &vec![3i16; 160], 16_000).unwrap();

        let buffer = read_wav(&path).unwrap();
        assert_eq!(buffer.len(), 160);
        assert!(buffer.samples().iter().all(|&s| s == 3));
    }

    #[test]
    fn test_read_rejects_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..64 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(matches!(read_wav(&path), Err(DomainError::Audio(_))));
    }
}
