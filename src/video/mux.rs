use crate::error::ClipResult;
use crate::utils::{ffmpeg_base_args, run_ffmpeg};

use std::ffi::OsString;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        EncodeSettings {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

// video from the first input, audio from the second
pub fn mux_args(video: &Path, audio: &Path, output: &Path, encode: &EncodeSettings) -> Vec<OsString> {
    let mut args = ffmpeg_base_args();
    for input in [video, audio] {
        args.push("-i".into());
        args.push(input.into());
    }
    for arg in ["-map", "0:v:0", "-map", "1:a:0", "-c:v", encode.video_codec.as_str(), "-c:a", encode.audio_codec.as_str()] {
        args.push(arg.into());
    }
    // mp4 players expect the index up front
    args.push("-movflags".into());
    args.push("+faststart".into());
    args.push(output.into());
    args
}

pub fn mux_audio(video: &Path, audio: &Path, output: &Path, encode: &EncodeSettings) -> ClipResult<()> {
    run_ffmpeg(&mux_args(video, audio, output, encode))
}
