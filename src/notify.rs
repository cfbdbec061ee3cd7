//! Incoming-message chime.
//!
//! Playback is fire-and-forget: a short sine tone on the default output
//! device, rendered on a throwaway thread so the UI frame never waits on
//! the audio backend.

use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::common::ClientError;

const CHIME_HZ: f32 = 880.0;
const CHIME_LENGTH: Duration = Duration::from_millis(160);

pub trait Notifier {
    fn play(&self) -> Result<(), ClientError>;
}

/// Used when the user muted notifications.
pub struct Silent;

impl Notifier for Silent {
    fn play(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

pub struct Chime;

impl Notifier for Chime {
    fn play(&self) -> Result<(), ClientError> {
        let host = cpal::default_host();
        if host.default_output_device().is_none() {
            return Err(ClientError::AudioUnavailable(
                "no default output device".to_string(),
            ));
        }

        thread::Builder::new()
            .name("chime".to_string())
            .spawn(|| {
                if let Err(err) = play_tone() {
                    log::debug!("Notification sound blocked: {err}");
                }
            })?;
        Ok(())
    }
}

fn play_tone() -> Result<(), ClientError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| ClientError::AudioUnavailable("no default output device".to_string()))?;
    let config = device
        .default_output_config()
        .map_err(|err| ClientError::AudioUnavailable(err.to_string()))?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(ClientError::AudioUnavailable(format!(
            "unsupported sample format {:?}",
            config.sample_format()
        )));
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    let total = (sample_rate * CHIME_LENGTH.as_secs_f32()) as usize;
    let mut position = 0usize;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                for frame in data.chunks_mut(channels) {
                    let value = chime_sample(position, total, sample_rate);
                    frame.fill(value);
                    position += 1;
                }
            },
            |err| log::debug!("Chime stream error: {err}"),
            None,
        )
        .map_err(|err| ClientError::AudioUnavailable(err.to_string()))?;

    stream
        .play()
        .map_err(|err| ClientError::AudioUnavailable(err.to_string()))?;
    thread::sleep(CHIME_LENGTH);
    Ok(())
}

/// Sine tone with a linear fade-out; silence past `total`.
fn chime_sample(position: usize, total: usize, sample_rate: f32) -> f32 {
    if position >= total {
        return 0.0;
    }
    let envelope = 1.0 - position as f32 / total as f32;
    (TAU * CHIME_HZ * position as f32 / sample_rate).sin() * 0.2 * envelope
}
