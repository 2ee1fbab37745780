use super::audio_clip::AudioClip;
use crate::error::ClipResult;
use crate::probe::MediaInfo;
use crate::utils::{ffmpeg_base_args, run_ffmpeg};

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

/// Working layout every track is decoded to, so tracks from different
/// cameras and sound libraries can be mixed sample by sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat { sample_rate: 44100, channels: 2 }
    }
}

pub fn extract_audio_args(source: &Path, output: &Path, format: AudioFormat) -> Vec<OsString> {
    let mut args = ffmpeg_base_args();
    args.push("-i".into());
    args.push(source.into());
    args.extend(
        [
            "-vn".to_string(),
            "-ar".to_string(),
            format.sample_rate.to_string(),
            "-ac".to_string(),
            format.channels.to_string(),
            "-c:a".to_string(),
            "pcm_s16le".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

// decodes and resamples the audio of any container into a wav using ffmpeg
pub fn extract_audio(source: &Path, output: &Path, format: AudioFormat) -> ClipResult<()> {
    run_ffmpeg(&extract_audio_args(source, output, format))
}

// loads the audio of a clip in the working format; clips without an audio stream count as silence
pub fn load_track(source: &Path, format: AudioFormat, info: &MediaInfo) -> ClipResult<AudioClip> {
    if !info.has_audio {
        debug!(source = %source.display(), "no audio stream, using silence");
        return Ok(silence_for(format, info.duration_secs));
    }

    let scratch = tempfile::tempdir()?;
    let wav = scratch.path().join("track.wav");
    extract_audio(source, &wav, format)?;
    let mut clip = AudioClip::new(&wav)?;
    clip.file_name = source.display().to_string();
    Ok(clip)
}

// loads a standalone audio file (wav, mp3, ...) in the working format
pub fn load_audio_file(source: &Path, format: AudioFormat) -> ClipResult<AudioClip> {
    let scratch = tempfile::tempdir()?;
    let wav = scratch.path().join("audio.wav");
    extract_audio(source, &wav, format)?;
    let mut clip = AudioClip::new(&wav)?;
    clip.file_name = source.display().to_string();
    Ok(clip)
}

pub fn silence_for(format: AudioFormat, duration_secs: f64) -> AudioClip {
    let num_samples = (duration_secs.max(0.0) * f64::from(format.sample_rate)).round() as usize;
    AudioClip::silent(format.sample_rate, usize::from(format.channels), num_samples)
}
