use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{debug, warn};

use crate::error::BackendError;

/// Asked to sound the buzzer once per 60 Hz step while the sound timer is running.
/// Calling it again while a tone is already playing must not stack tones.
pub trait BeepSink {
    fn beep(&mut self);
}

const TONE_HZ: f32 = 440.0;
// each request keeps the tone alive for two timer steps so back to back requests
// join into one continuous beep
const TONE_STEPS: u32 = 2;

/// A cpal output stream that plays a sine tone while it has frames left to play.
pub struct Sound {
    _stream: cpal::Stream,
    remaining: Arc<AtomicU32>,
    tone_frames: u32,
}

impl Sound {
    pub fn new() -> Result<Self, BackendError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(BackendError::NoOutputDevice)?;
        let supported_config = device
            .default_output_config()
            .map_err(|e| BackendError::Audio(e.to_string()))?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let remaining = Arc::new(AtomicU32::new(0));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::run::<i8>(&device, &config, remaining.clone()),
            cpal::SampleFormat::I16 => Self::run::<i16>(&device, &config, remaining.clone()),
            cpal::SampleFormat::I32 => Self::run::<i32>(&device, &config, remaining.clone()),
            cpal::SampleFormat::I64 => Self::run::<i64>(&device, &config, remaining.clone()),
            cpal::SampleFormat::U8 => Self::run::<u8>(&device, &config, remaining.clone()),
            cpal::SampleFormat::U16 => Self::run::<u16>(&device, &config, remaining.clone()),
            cpal::SampleFormat::U32 => Self::run::<u32>(&device, &config, remaining.clone()),
            cpal::SampleFormat::U64 => Self::run::<u64>(&device, &config, remaining.clone()),
            cpal::SampleFormat::F32 => Self::run::<f32>(&device, &config, remaining.clone()),
            cpal::SampleFormat::F64 => Self::run::<f64>(&device, &config, remaining.clone()),
            sample_format => {
                return Err(BackendError::Audio(format!(
                    "unsupported sample format '{sample_format}'"
                )))
            }
        }?;
        stream
            .play()
            .map_err(|e| BackendError::Audio(e.to_string()))?;

        let tone_frames = config.sample_rate.0 / 60 * TONE_STEPS;
        debug!(
            "audio stream open: {} Hz, {} channel(s), {sample_format}",
            config.sample_rate.0, config.channels
        );
        Ok(Self {
            _stream: stream,
            remaining,
            tone_frames,
        })
    }

    fn run<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        remaining: Arc<AtomicU32>,
    ) -> Result<cpal::Stream, BackendError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin() * 0.25
        };

        let err_fn = |err| warn!("an error occurred on the audio stream: {}", err);

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    Self::write_data(data, channels, &remaining, &mut next_value)
                },
                err_fn,
                None,
            )
            .map_err(|e| BackendError::Audio(e.to_string()))
    }

    fn write_data<T>(
        output: &mut [T],
        channels: usize,
        remaining: &AtomicU32,
        next_sample: &mut dyn FnMut() -> f32,
    ) where
        T: Sample + FromSample<f32>,
    {
        let left = remaining.load(Ordering::Acquire);
        let mut played = 0;
        for frame in output.chunks_mut(channels) {
            let value: T = if played < left {
                played += 1;
                T::from_sample(next_sample())
            } else {
                T::from_sample(0.0f32)
            };
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
        // beep() only ever raises the counter, so this can't wrap
        remaining.fetch_sub(played, Ordering::AcqRel);
    }
}

impl BeepSink for Sound {
    fn beep(&mut self) {
        self.remaining.fetch_max(self.tone_frames, Ordering::AcqRel);
    }
}

impl<T: BeepSink + ?Sized> BeepSink for Box<T> {
    fn beep(&mut self) {
        (**self).beep();
    }
}

/// Stands in when no output device is available.
#[derive(Debug, Default)]
pub struct Silent;

impl BeepSink for Silent {
    fn beep(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_data_plays_only_remaining_frames() {
        let remaining = AtomicU32::new(3);
        let mut out = [0.0f32; 10];
        Sound::write_data(&mut out, 2, &remaining, &mut || 1.0f32);
        // 5 stereo frames, 3 of them audible
        assert_eq!(out, [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(remaining.load(Ordering::Acquire), 0);
    }

    #[test]
    fn write_data_keeps_unplayed_frames() {
        let remaining = AtomicU32::new(100);
        let mut out = [0i16; 4];
        Sound::write_data(&mut out, 1, &remaining, &mut || 0.5f32);
        assert_eq!(remaining.load(Ordering::Acquire), 96);
        assert!(out.iter().all(|s| *s != 0));
    }
}
