use crate::error::ClipResult;

use std::fmt;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use itertools::Itertools;

pub type Channel = Vec<Sample>;
pub type Sample = f32;

// a decoded track: one buffer per channel, samples in [-1, 1]
#[derive(Clone, PartialEq)]
pub struct AudioClip {
    pub channels: Vec<Channel>,
    pub file_name: String,
    pub sample_rate: u32,
    pub num_channels: usize,
    pub num_samples: usize,
}

impl AudioClip {
    pub fn new(source: &Path) -> ClipResult<Self> {
        let mut reader = WavReader::open(source)?;
        let spec = reader.spec();
        let num_channels = usize::from(spec.channels);

        let interleaved: Vec<Sample> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample - 1)) as Sample;
                reader
                    .samples::<i32>()
                    .map_ok(|sample| sample as Sample / scale)
                    .collect::<Result<_, _>>()?
            }
        };

        let num_samples = interleaved.len() / num_channels.max(1);
        let mut channels = vec![Channel::with_capacity(num_samples); num_channels];
        for frame in interleaved.chunks_exact(num_channels) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }

        Ok(AudioClip {
            channels,
            file_name: source.display().to_string(),
            sample_rate: spec.sample_rate,
            num_channels,
            num_samples,
        })
    }

    pub fn silent(sample_rate: u32, num_channels: usize, num_samples: usize) -> Self {
        AudioClip {
            channels: vec![vec![0.0; num_samples]; num_channels],
            file_name: "silence".to_string(),
            sample_rate,
            num_channels,
            num_samples,
        }
    }

    // 16-bit pcm; anything past full scale is clipped rather than wrapped
    pub fn write(&self, output: &Path) -> ClipResult<()> {
        let spec = WavSpec {
            channels: u16::try_from(self.num_channels).unwrap_or(u16::MAX),
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(output, spec)?;
        for sample_idx in 0..self.num_samples {
            for channel in self.channels.iter() {
                let sample = channel[sample_idx].clamp(-1.0, 1.0);
                writer.write_sample((sample * i16::MAX as Sample).round() as i16)?;
            }
        }
        writer.finalize()?;
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / f64::from(self.sample_rate)
    }

    pub fn peak(&self) -> Sample {
        self.channels
            .iter()
            .flatten()
            .fold(0.0, |peak: Sample, sample| peak.max(sample.abs()))
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("file_name", &self.file_name)
            .field("sample_rate", &self.sample_rate)
            .field("num_channels", &self.num_channels)
            .field("num_samples", &self.num_samples)
            .finish()
    }
}
