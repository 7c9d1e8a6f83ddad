use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::adapters::wav_file;
use crate::domain::{
    AtomicCaptureState, AudioBuffer, AudioConfig, AudioDevice, CancelToken, CaptureState,
    DomainError,
};
use crate::ports::{AudioCapture, RecordingSummary};

/// Lock-free ring buffer carrying samples from the stream callback to the
/// recording worker.
type RingProducer = ringbuf::HeapProd<i16>;
type RingConsumer = ringbuf::HeapCons<i16>;

/// Stream setup and sample conversion helpers.
mod capture {
    use super::*;

    /// Resolve an input device by its enumeration index.
    ///
    /// The index is taken at face value; a stale or out-of-range index is
    /// reported here, when the stream is about to open.
    pub fn input_device_at(index: usize) -> Result<Device, DomainError> {
        let host = cpal::default_host();
        let mut devices = host.input_devices().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to enumerate devices: {}", e),
        })?;

        devices.nth(index).ok_or_else(|| DomainError::AudioDevice {
            message: format!("No input device at index {}", index),
        })
    }

    pub fn build_stream(
        device: &Device,
        target_sample_rate: u32,
        mut producer: RingProducer,
    ) -> Result<Stream, DomainError> {
        let supported = device.default_input_config().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to get default config: {}", e),
        })?;

        debug!(
            sample_rate = ?supported.sample_rate(),
            channels = supported.channels(),
            format = ?supported.sample_format(),
            "Device default config"
        );

        let sample_format = supported.sample_format();
        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        let channels = config.channels as usize;
        let device_sample_rate = config.sample_rate.0;

        let err_fn = |err| error!(?err, "Audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    push_samples(
                        data,
                        channels,
                        device_sample_rate,
                        target_sample_rate,
                        &mut producer,
                    );
                },
                err_fn,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> = data
                        .iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                        .collect();

                    push_samples(
                        &i16_data,
                        channels,
                        device_sample_rate,
                        target_sample_rate,
                        &mut producer,
                    );
                },
                err_fn,
                None,
            ),
            _ => {
                return Err(DomainError::AudioDevice {
                    message: format!("Unsupported sample format: {:?}", sample_format),
                });
            }
        }
        .map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to build stream: {}", e),
        })?;

        Ok(stream)
    }

    /// Downmix to mono, resample to the target rate, push into the ring.
    fn push_samples(
        data: &[i16],
        channels: usize,
        device_sample_rate: u32,
        target_sample_rate: u32,
        producer: &mut RingProducer,
    ) {
        let mono = downmix(data, channels);
        let resampled = if device_sample_rate != target_sample_rate {
            resample(&mono, device_sample_rate, target_sample_rate)
        } else {
            mono
        };

        // On a full ring the overflow is dropped; the callback must never block.
        let _ = producer.push_slice(&resampled);
    }

    pub fn downmix(data: &[i16], channels: usize) -> Vec<i16> {
        if channels <= 1 {
            return data.to_vec();
        }
        data.chunks(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Linear interpolation resampler.
    pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
        if from_rate == to_rate || samples.is_empty() {
            return samples.to_vec();
        }

        let ratio = from_rate as f64 / to_rate as f64;
        let output_len = (samples.len() as f64 / ratio).ceil() as usize;
        let mut output = Vec::with_capacity(output_len);

        for i in 0..output_len {
            let src_pos = i as f64 * ratio;
            let src_idx = src_pos.floor() as usize;
            let frac = src_pos.fract();

            let sample = if src_idx + 1 < samples.len() {
                let s0 = samples[src_idx] as f64;
                let s1 = samples[src_idx + 1] as f64;
                (s0 + (s1 - s0) * frac) as i16
            } else if src_idx < samples.len() {
                samples[src_idx]
            } else {
                0
            };
            output.push(sample);
        }
        output
    }
}

/// Body of the `audio-capture` thread.
///
/// Opens the stream, reports setup success or failure through `ready`, then
/// drains the ring once per chunk period until the token is cancelled. The
/// stream is stopped before the final drain so the last completed callback
/// chunk always makes it into the file.
fn recording_worker(
    device_index: usize,
    config: AudioConfig,
    output: PathBuf,
    token: CancelToken,
    ready: oneshot::Sender<Result<(), DomainError>>,
) -> Result<RecordingSummary, DomainError> {
    let setup = (|| -> Result<(Stream, RingConsumer), DomainError> {
        let device = capture::input_device_at(device_index)?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let ring = HeapRb::<i16>::new(config.ring_capacity());
        let (producer, consumer) = ring.split();

        let stream = capture::build_stream(&device, config.sample_rate, producer)?;
        stream.play().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to start stream: {}", e),
        })?;

        info!(device = %device_name, device_index, "Recording started");
        Ok((stream, consumer))
    })();

    let (stream, mut consumer) = match setup {
        Ok(parts) => {
            let _ = ready.send(Ok(()));
            parts
        }
        Err(e) => {
            let message = e.to_string();
            let _ = ready.send(Err(e));
            return Err(DomainError::Audio(message));
        }
    };

    let mut buffer = AudioBuffer::with_capacity(config.sample_rate, config.ring_capacity());
    let mut scratch = vec![0i16; config.chunk_frames as usize];
    let chunk_period = config.chunk_duration();

    while !token.is_cancelled() {
        thread::sleep(chunk_period);
        drain(&mut consumer, &mut buffer, &mut scratch);
    }

    // Stop capturing, then pick up whatever the callback delivered before
    // the stream went down.
    drop(stream);
    drain(&mut consumer, &mut buffer, &mut scratch);

    wav_file::write_wav(&output, buffer.samples(), config.sample_rate)?;

    let summary = RecordingSummary {
        path: output,
        samples: buffer.len(),
        duration_secs: buffer.duration_secs(),
    };

    info!(
        samples = summary.samples,
        duration_secs = summary.duration_secs,
        path = ?summary.path,
        "Recording stopped and saved"
    );

    Ok(summary)
}

fn drain(consumer: &mut RingConsumer, buffer: &mut AudioBuffer, scratch: &mut [i16]) {
    loop {
        let read = consumer.pop_slice(scratch);
        if read == 0 {
            break;
        }
        buffer.push_samples(&scratch[..read]);
    }
}

struct ActiveRecording {
    token: CancelToken,
    handle: JoinHandle<Result<RecordingSummary, DomainError>>,
}

/// cpal-based audio capture.
///
/// Each recording runs on a dedicated worker thread that owns the non-Send
/// stream; stopping is cooperative through a cancel token.
pub struct CpalRecorder {
    config: AudioConfig,
    state: AtomicCaptureState,
    active: Mutex<Option<ActiveRecording>>,
}

impl CpalRecorder {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            state: AtomicCaptureState::default(),
            active: Mutex::new(None),
        }
    }
}

impl Drop for CpalRecorder {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.token.cancel();
            let _ = active.handle.join();
        }
    }
}

#[async_trait]
impl AudioCapture for CpalRecorder {
    fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let devices = host.input_devices().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to enumerate devices: {}", e),
        })?;

        let mut result = Vec::new();
        for (index, device) in devices.enumerate() {
            let Ok(name) = device.name() else { continue };
            let input_channels = device
                .default_input_config()
                .map(|c| c.channels())
                .unwrap_or(0);

            result.push(AudioDevice {
                index,
                is_default: Some(&name) == default_name.as_ref(),
                name,
                input_channels,
            });
        }

        debug!(count = result.len(), "Listed input devices");
        Ok(result)
    }

    async fn start_recording(&self, device_index: usize, output: &Path) -> Result<(), DomainError> {
        if !self.state.load().can_start_recording() {
            return Err(DomainError::AlreadyRecording);
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let token = CancelToken::new();

        let worker_token = token.clone();
        let worker_config = self.config.clone();
        let worker_output = output.to_path_buf();

        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                recording_worker(
                    device_index,
                    worker_config,
                    worker_output,
                    worker_token,
                    ready_tx,
                )
            })
            .map_err(|e| DomainError::AudioDevice {
                message: format!("Failed to spawn audio thread: {}", e),
            })?;

        match ready_rx.await {
            Ok(Ok(())) => {
                *self.active.lock() = Some(ActiveRecording { token, handle });
                self.state.store(CaptureState::Recording);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(DomainError::AudioDevice {
                    message: "Audio thread exited during startup".to_string(),
                })
            }
        }
    }

    async fn stop_recording(&self) -> Result<RecordingSummary, DomainError> {
        let active = self
            .active
            .lock()
            .take()
            .ok_or(DomainError::NotRecording)?;

        active.token.cancel();

        let joined = tokio::task::spawn_blocking(move || active.handle.join())
            .await
            .map_err(|e| DomainError::Audio(format!("Join task error: {}", e)))?;

        let result = joined
            .map_err(|_| DomainError::Audio("Recording worker panicked".to_string()))
            .and_then(|r| r);

        self.state.store(CaptureState::Idle);
        result
    }

    fn state(&self) -> CaptureState {
        self.state.load()
    }

    fn config(&self) -> AudioConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let stereo = vec![100, 300, -200, -400, 500, 500];
        assert_eq!(capture::downmix(&stereo, 2), vec![200, -300, 500]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let mono = vec![1, 2, 3];
        assert_eq!(capture::downmix(&mono, 1), mono);
    }

    #[test]
    fn test_resample_same_rate() {
        let samples = vec![100, 200, 300, 400];
        assert_eq!(capture::resample(&samples, 48000, 48000), samples);
    }

    #[test]
    fn test_resample_downsample() {
        let samples: Vec<i16> = (0..48).map(|i| i * 100).collect();
        let result = capture::resample(&samples, 48000, 16000);
        assert!(result.len() >= 15 && result.len() <= 17);
    }

    #[test]
    fn test_resample_upsample() {
        let samples = vec![0, 1000, 2000, 3000];
        let result = capture::resample(&samples, 8000, 16000);
        assert!(result.len() >= 7 && result.len() <= 9);
    }

    #[test]
    fn test_drain_moves_everything() {
        let ring = HeapRb::<i16>::new(64);
        let (mut producer, mut consumer) = ring.split();

        producer.push_slice(&[1, 2, 3, 4, 5]);

        let mut buffer = AudioBuffer::new(16_000);
        let mut scratch = vec![0i16; 2];
        drain(&mut consumer, &mut buffer, &mut scratch);

        assert_eq!(buffer.samples(), &[1, 2, 3, 4, 5]);
    }
}
