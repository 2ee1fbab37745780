use super::audio_clip::AudioClip;
use crate::error::{ClipError, ClipResult};

use itertools::{EitherOrBoth, Itertools};

pub fn check_sound_level(level: f32) -> ClipResult<()> {
    if level.is_finite() && level >= 0.0 {
        Ok(())
    } else {
        Err(ClipError::InvalidSoundLevel(level))
    }
}

impl AudioClip {
    // scales every sample; 1.0 leaves the clip untouched
    pub fn gain(&self, level: f32) -> ClipResult<Self> {
        check_sound_level(level)?;

        let mut clip = self.clone();
        if level != 1.0 {
            for sample in clip.channels.iter_mut().flatten() {
                *sample *= level;
            }
        }
        Ok(clip)
    }

    // both tracks start at zero and are summed; the result is as long as the longer one
    pub fn overlay(&self, other: &AudioClip) -> ClipResult<Self> {
        if self.sample_rate != other.sample_rate || self.num_channels != other.num_channels {
            return Err(ClipError::AudioMismatch {
                left: format!("{} Hz x{}", self.sample_rate, self.num_channels),
                right: format!("{} Hz x{}", other.sample_rate, other.num_channels),
            });
        }

        let channels = self
            .channels
            .iter()
            .zip(other.channels.iter())
            .map(|(base, top)| {
                base.iter()
                    .zip_longest(top.iter())
                    .map(|pair| match pair {
                        EitherOrBoth::Both(a, b) => a + b,
                        EitherOrBoth::Left(s) | EitherOrBoth::Right(s) => *s,
                    })
                    .collect_vec()
            })
            .collect_vec();

        Ok(AudioClip {
            channels,
            file_name: format!("{}+{}", self.file_name, other.file_name),
            sample_rate: self.sample_rate,
            num_channels: self.num_channels,
            num_samples: self.num_samples.max(other.num_samples),
        })
    }

    // truncates or pads with silence to exactly `num_samples`
    pub fn fit_to(&self, num_samples: usize) -> Self {
        let mut clip = self.clone();
        for channel in clip.channels.iter_mut() {
            channel.resize(num_samples, 0.0);
        }
        clip.num_samples = num_samples;
        clip
    }

    // gain then overlay, fitted back to the base track's length
    pub fn composite(&self, top: &AudioClip, level: f32) -> ClipResult<Self> {
        let mixed = self.overlay(&top.gain(level)?)?;
        Ok(mixed.fit_to(self.num_samples))
    }

    pub fn samples_for(&self, duration_secs: f64) -> usize {
        (duration_secs * f64::from(self.sample_rate)).round() as usize
    }
}
