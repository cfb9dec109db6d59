//! Cross-platform microphone capture using cpal
//!
//! Speech-optimized output:
//! - 16kHz sample rate (resampled from the device rate when needed)
//! - Mono channel, 16-bit samples

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{AudioCapture, CaptureError};
use crate::domain::recording::CapturedAudio;

/// Sample rate of every capture handed back by [`CpalCapture::finish`]
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// How long the capture thread may take to open the stream
const STARTUP_TIMEOUT: StdDuration = StdDuration::from_secs(3);

/// Poll interval of the capture thread while the stream is open
const WORKER_TICK: StdDuration = StdDuration::from_millis(20);

/// Microphone capture backed by the default cpal input device.
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated thread
/// and is dropped there once the capture finishes.
pub struct CpalCapture {
    /// Captured samples (mono, i16, at device sample rate)
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate of the open capture, 0 before the stream opened
    device_sample_rate: Arc<AtomicU32>,
    /// Stream open (collecting or paused)
    is_capturing: Arc<AtomicBool>,
    /// Incoming samples are dropped while set
    is_paused: Arc<AtomicBool>,
    worker: StdMutex<Option<JoinHandle<()>>>,
}

/// Destination of the stream callback
struct SampleSink {
    buffer: Arc<StdMutex<Vec<i16>>>,
    paused: Arc<AtomicBool>,
    channels: u16,
}

impl SampleSink {
    fn push(&self, interleaved: &[i16]) {
        if self.paused.load(Ordering::SeqCst) {
            return;
        }
        let mono = CpalCapture::downmix(interleaved, self.channels);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(&mono);
        }
    }
}

impl CpalCapture {
    /// Create a new capture adapter; no device is opened until `begin`.
    pub fn new() -> Self {
        Self {
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_capturing: Arc::new(AtomicBool::new(false)),
            is_paused: Arc::new(AtomicBool::new(false)),
            worker: StdMutex::new(None),
        }
    }

    /// Get the default input device
    fn input_device() -> Result<cpal::Device, CaptureError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Pick an i16/f32 input configuration, preferring mono and 16kHz
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

        let includes_target = |config: &cpal::SupportedStreamConfigRange| {
            config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        };

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if !matches!(config.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
                continue;
            }

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate = includes_target(&config) && !includes_target(current);
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or_else(|| {
            CaptureError::StartFailed("No i16 or f32 input configuration".into())
        })?;

        let sample_rate = if includes_target(&range) {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, range.sample_format()))
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        sink: SampleSink,
    ) -> Result<cpal::Stream, CaptureError> {
        let on_error = |err: cpal::StreamError| warn!(error = %err, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| sink.push(data),
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    sink.push(&Self::f32_to_i16(data))
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| match e {
            cpal::BuildStreamError::DeviceNotAvailable => CaptureError::NoAudioDevice,
            other => CaptureError::StartFailed(other.to_string()),
        })
    }

    /// Open and play a stream on the default device
    fn open_stream(
        buffer: Arc<StdMutex<Vec<i16>>>,
        paused: Arc<AtomicBool>,
    ) -> Result<(cpal::Stream, u32), CaptureError> {
        let device = Self::input_device()?;
        let (config, sample_format) = Self::input_config(&device)?;
        let sink = SampleSink {
            buffer,
            paused,
            channels: config.channels,
        };

        let stream = Self::build_stream(&device, &config, sample_format, sink)?;
        stream
            .play()
            .map_err(|e| CaptureError::DeviceBusy(e.to_string()))?;

        Ok((stream, config.sample_rate.0))
    }

    fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
        samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .collect()
    }

    /// Average interleaved channels down to mono
    fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    }

    /// Resample mono audio to 16kHz if needed
    fn resample_to_target(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, CaptureError> {
        if source_rate == TARGET_SAMPLE_RATE || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();
        let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            1024, // chunk size
            2,    // sub-chunks
            1,    // mono
        )
        .map_err(|e| CaptureError::StreamFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());

            // last chunk is zero-padded to a full frame
            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            chunk.resize(frames_needed, 0.0);

            let resampled = resampler
                .process(&[chunk], None)
                .map_err(|e| CaptureError::StreamFailed(format!("Resampling failed: {}", e)))?;

            output.extend(resampled[0].iter().map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);
        Ok(output)
    }

    fn take_worker(&self) -> Option<JoinHandle<()>> {
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn require_capturing(&self) -> Result<(), CaptureError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CaptureError::NotCapturing)
        }
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn is_available(&self) -> bool {
        tokio::task::spawn_blocking(|| Self::input_device().is_ok())
            .await
            .unwrap_or(false)
    }

    async fn has_permission(&self) -> Result<bool, CaptureError> {
        // Desktop platforms have no permission query; a device that refuses
        // to list its configurations is treated as not granted.
        tokio::task::spawn_blocking(|| match Self::input_device() {
            Ok(device) => Ok(device.supported_input_configs().is_ok()),
            Err(_) => Ok(false),
        })
        .await
        .map_err(|e| CaptureError::StreamFailed(format!("Permission probe failed: {}", e)))?
    }

    async fn request_permission(&self) -> Result<bool, CaptureError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            return Ok(true);
        }

        // Opening a stream is what makes the OS show its consent prompt.
        let probe = tokio::task::spawn_blocking(|| {
            let (stream, _) = Self::open_stream(
                Arc::new(StdMutex::new(Vec::new())),
                Arc::new(AtomicBool::new(true)),
            )?;
            drop(stream);
            Ok::<(), CaptureError>(())
        })
        .await
        .map_err(|e| CaptureError::StreamFailed(format!("Permission probe failed: {}", e)))?;

        match probe {
            Ok(()) => Ok(true),
            Err(CaptureError::NoAudioDevice) => Ok(false),
            Err(CaptureError::PermissionDenied(reason)) => {
                debug!(%reason, "microphone access refused");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn begin(&self) -> Result<(), CaptureError> {
        if self.is_capturing.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::DeviceBusy("Capture already open".into()));
        }

        self.audio_buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        self.is_paused.store(false, Ordering::SeqCst);
        self.device_sample_rate.store(0, Ordering::SeqCst);

        let (ready_tx, ready_rx) = oneshot::channel();
        let buffer = Arc::clone(&self.audio_buffer);
        let paused = Arc::clone(&self.is_paused);
        let capturing = Arc::clone(&self.is_capturing);
        let sample_rate = Arc::clone(&self.device_sample_rate);

        let spawned = std::thread::Builder::new()
            .name("voice-capture".into())
            .spawn(move || {
                let stream = match Self::open_stream(buffer, paused) {
                    Ok((stream, rate)) => {
                        sample_rate.store(rate, Ordering::SeqCst);
                        let _ = ready_tx.send(Ok(rate));
                        stream
                    }
                    Err(e) => {
                        capturing.store(false, Ordering::SeqCst);
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while capturing.load(Ordering::SeqCst) {
                    std::thread::sleep(WORKER_TICK);
                }

                drop(stream);
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.is_capturing.store(false, Ordering::SeqCst);
                return Err(CaptureError::StartFailed(e.to_string()));
            }
        };
        *self.worker.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);

        match tokio::time::timeout(STARTUP_TIMEOUT, ready_rx).await {
            Ok(Ok(Ok(rate))) => {
                debug!(rate, "capture stream opened");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(_)) => {
                self.is_capturing.store(false, Ordering::SeqCst);
                Err(CaptureError::StartFailed(
                    "Capture thread exited before the stream opened".into(),
                ))
            }
            Err(_) => {
                self.is_capturing.store(false, Ordering::SeqCst);
                Err(CaptureError::StartFailed(
                    "Timed out opening the input stream".into(),
                ))
            }
        }
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        self.require_capturing()?;
        self.is_paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        self.require_capturing()?;
        self.is_paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn finish(&self) -> Result<CapturedAudio, CaptureError> {
        if !self.is_capturing.swap(false, Ordering::SeqCst) {
            return Err(CaptureError::NotCapturing);
        }
        self.is_paused.store(false, Ordering::SeqCst);

        if let Some(handle) = self.take_worker() {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .map_err(|e| CaptureError::StreamFailed(format!("Join task error: {}", e)))?
                .map_err(|_| CaptureError::StreamFailed("Capture thread panicked".into()))?;
        }

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        let samples = std::mem::take(
            &mut *self
                .audio_buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        if samples.is_empty() || sample_rate == 0 {
            return Ok(CapturedAudio::new(Vec::new(), TARGET_SAMPLE_RATE));
        }

        let resampled =
            tokio::task::spawn_blocking(move || Self::resample_to_target(&samples, sample_rate))
                .await
                .map_err(|e| CaptureError::StreamFailed(format!("Resample task error: {}", e)))??;

        Ok(CapturedAudio::new(resampled, TARGET_SAMPLE_RATE))
    }

    fn elapsed_ms(&self) -> u64 {
        let rate = self.device_sample_rate.load(Ordering::SeqCst) as u64;
        if rate == 0 {
            return 0;
        }
        let samples = self
            .audio_buffer
            .lock()
            .map(|buffer| buffer.len() as u64)
            .unwrap_or(0);
        samples * 1000 / rate
    }
}
