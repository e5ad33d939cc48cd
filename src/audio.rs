//! cpal output stream feeding from the shared SID model.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use thiserror::Error;

use crate::sid::Sid;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("error while querying output configs: {0}")]
    QueryConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("no supported output config")]
    NoConfig,
    #[error("unsupported sample format '{0}'")]
    SampleFormat(cpal::SampleFormat),
    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Keeps the output stream alive for as long as it is held.
pub struct Audio {
    _stream: cpal::Stream,
}

impl Audio {
    pub fn start(sid: Arc<Mutex<Sid>>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device
            .supported_output_configs()?
            .next()
            .ok_or(AudioError::NoConfig)?
            .with_max_sample_rate();
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let stream = match format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config, sid),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config, sid),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config, sid),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config, sid),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config, sid),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config, sid),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config, sid),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config, sid),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config, sid),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config, sid),
            other => return Err(AudioError::SampleFormat(other)),
        }?;
        stream.play()?;
        Ok(Self { _stream: stream })
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sid: Arc<Mutex<Sid>>,
    ) -> Result<cpal::Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let mut mono: Vec<f32> = Vec::new();

        let err_fn = |err| log::error!("audio stream error: {err}");

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mono.resize(data.len() / channels, 0.0);
                match sid.lock() {
                    Ok(mut sid) => sid.render(&mut mono, sample_rate),
                    Err(_) => mono.fill(0.0),
                }
                Self::write_data(data, channels, &mono);
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }

    fn write_data<T>(output: &mut [T], channels: usize, mono: &[f32])
    where
        T: Sample + FromSample<f32>,
    {
        for (frame, value) in output.chunks_mut(channels).zip(mono.iter()) {
            let value: T = T::from_sample(*value);
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
