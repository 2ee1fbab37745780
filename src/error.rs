use std::path::PathBuf;

use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("clip {clip} not found, tried {tried:?}")]
    ClipNotFound { clip: String, tried: Vec<PathBuf> },

    #[error("no leading clip number in file name: {0}")]
    InvalidClipName(String),

    #[error("sound level must be finite and non-negative, got {0}")]
    InvalidSoundLevel(f32),

    #[error("invalid resize target: {0}")]
    InvalidResize(String),

    #[error("output {0} is the input clip")]
    OverwritesInput(PathBuf),

    #[error("audio tracks differ: {left} vs {right}")]
    AudioMismatch { left: String, right: String },

    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("ffmpeg failed with status {status:?}: {stderr}")]
    FfmpegFailed { status: Option<i32>, stderr: String },

    #[error("failed to probe media: {0}")]
    Probe(#[from] ffmpeg_next::Error),

    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
