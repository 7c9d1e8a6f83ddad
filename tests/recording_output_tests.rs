//! File-output behavior: WAV format invariants and truncate-on-rerun for
//! both the recording and the transcript log.

use std::fs;

use hound::WavReader;
use tempfile::tempdir;

use voxnote::adapters::wav_file;
use voxnote::app::write_transcript;
use voxnote::domain::{Segment, Transcript};

#[test]
fn recorded_wav_is_mono_16bit_16khz() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("continuous_recording.wav");

    // Three synthetic chunks, appended in order as the worker would.
    let mut samples = Vec::new();
    samples.extend(vec![100i16; 1024]);
    samples.extend(vec![-200i16; 1024]);
    samples.extend(vec![300i16; 512]);

    wav_file::write_wav(&path, &samples, 16_000).unwrap();

    let reader = WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, 16_000);

    let read_back: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(read_back, samples);
}

#[test]
fn second_run_replaces_wav_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("continuous_recording.wav");

    wav_file::write_wav(&path, &vec![1i16; 48_000], 16_000).unwrap();
    wav_file::write_wav(&path, &vec![2i16; 800], 16_000).unwrap();

    let buffer = wav_file::read_wav(&path).unwrap();
    assert_eq!(buffer.len(), 800);
    assert!(buffer.samples().iter().all(|&s| s == 2));
}

#[test]
fn second_run_replaces_transcript_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    let first = Transcript {
        segments: vec![
            Segment { start_ms: 0, end_ms: 1200, text: " A rather long".to_string() },
            Segment { start_ms: 1200, end_ms: 2400, text: " first note.".to_string() },
        ],
        language: Some("en".to_string()),
    };
    let second = Transcript {
        segments: vec![Segment { start_ms: 0, end_ms: 600, text: " Again.".to_string() }],
        language: Some("en".to_string()),
    };

    write_transcript(&path, &first.text()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "A rather long first note.");

    write_transcript(&path, &second.text()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "Again.");
}
