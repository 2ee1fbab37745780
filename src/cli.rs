use crate::audio::{AudioFormat, DEFAULT_TARGET_PEAK};
use crate::clip_name::ClipId;
use crate::error::ClipResult;
use crate::video::{parse_aspect, EncodeSettings};

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

#[derive(Clone, Debug)]
pub struct Config {
    pub clips_dir: PathBuf,
    pub output_dir: PathBuf,
    pub clip_suffix: String,
    pub merge_log: PathBuf,
    pub audio: AudioFormat,
    pub encode: EncodeSettings,
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// number of clips processed at once for list and batch commands; default is 1
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// directory the numbered clips are read from
    #[arg(long, default_value = "equalized_clips")]
    pub clips_dir: PathBuf,

    /// directory every output file is written to; created if missing
    #[arg(long, default_value = "augmented_clips")]
    pub output_dir: PathBuf,

    /// text between the clip number and the extension, e.g. `clip` for `95clip.mp4`
    #[arg(long, default_value = "clip")]
    pub clip_suffix: String,

    /// append-only log of merged primary/secondary pairs
    #[arg(long, default_value = "merge_list.txt")]
    pub merge_log: PathBuf,

    /// sample rate all audio is mixed at
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,

    /// channel count all audio is mixed at
    #[arg(long, default_value_t = 2)]
    pub channels: u16,

    #[arg(long, default_value = "libx264")]
    pub video_codec: String,

    #[arg(long, default_value = "aac")]
    pub audio_codec: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// overlays an audio file onto a clip's own audio
    Augment {
        clip: PathBuf,
        audio: PathBuf,
        /// volume of the overlaid audio, 1 meaning unchanged
        #[arg(short, long, default_value_t = 1.0)]
        sound_level: f32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// overlays a secondary clip's audio onto a primary clip and records the pair
    Merge {
        primary: ClipId,
        secondary: ClipId,
        #[arg(short, long, default_value_t = 1.0)]
        sound_level: f32,
    },

    /// runs every `primary,secondary,sound_level` row of a csv plan
    MergeBatch {
        plan: PathBuf,
        /// level used by rows that leave `sound_level` empty
        #[arg(short, long, default_value_t = 1.0)]
        sound_level: f32,
        /// skips pairs already present in the merge log
        #[arg(long, default_value_t = false)]
        skip_logged: bool,
    },

    /// replaces a clip's audio with an audio file
    Replace { clip: PathBuf, audio: PathBuf },

    /// writes the audio of each clip to a wav file
    Detach {
        #[arg(required = true)]
        clips: Vec<ClipId>,
    },

    /// peak-normalizes the audio of each clip
    Equalize {
        #[arg(required = true)]
        clips: Vec<ClipId>,
        #[arg(long, default_value_t = DEFAULT_TARGET_PEAK)]
        target_peak: f32,
    },

    /// resizes each clip to a common height, optionally cropping to an aspect ratio like 16:9
    Resize {
        #[arg(required = true)]
        clips: Vec<ClipId>,
        #[arg(long)]
        height: u32,
        #[arg(long, value_parser = parse_aspect)]
        crop: Option<(u32, u32)>,
    },

    /// prints the pairs recorded in the merge log
    Pairings,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            clips_dir: self.clips_dir.clone(),
            output_dir: self.output_dir.clone(),
            clip_suffix: self.clip_suffix.clone(),
            merge_log: self.merge_log.clone(),
            audio: AudioFormat {
                sample_rate: self.sample_rate,
                channels: self.channels,
            },
            encode: EncodeSettings {
                video_codec: self.video_codec.clone(),
                audio_codec: self.audio_codec.clone(),
            },
        }
    }
}

impl Config {
    #[cfg(test)]
    pub fn with_dirs(clips_dir: &Path, output_dir: &Path) -> Config {
        Config {
            clips_dir: clips_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            clip_suffix: "clip".to_string(),
            merge_log: output_dir.join("merge_list.txt"),
            audio: AudioFormat::default(),
            encode: EncodeSettings::default(),
        }
    }

    pub fn output_path(&self, file_name: &str) -> ClipResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(file_name))
    }

    /// Places a user-given output path. Relative paths land under `output_dir`,
    /// absolute ones are kept; either way the parent directory is created.
    pub fn resolve_output(&self, output: &Path) -> ClipResult<PathBuf> {
        let output = if output.is_absolute() { output.to_path_buf() } else { self.output_dir.join(output) };
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["clip-augment", "merge", "95", "12"]).unwrap();
        let config = cli.config();
        assert_eq!(config.clips_dir, PathBuf::from("equalized_clips"));
        assert_eq!(config.merge_log, PathBuf::from("merge_list.txt"));
        assert_eq!(config.audio, AudioFormat::default());
        assert_eq!(config.encode, EncodeSettings::default());
        assert!(cli.threads.is_none());
        match cli.command {
            Commands::Merge { primary, secondary, sound_level } => {
                assert_eq!((primary, secondary), (ClipId(95), ClipId(12)));
                assert_eq!(sound_level, 1.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resize_command() {
        let cli = Cli::try_parse_from(["clip-augment", "-t", "4", "resize", "1", "2clip.mov", "--height", "720", "--crop", "16:9"])
            .unwrap();
        assert_eq!(cli.threads, Some(4));
        match cli.command {
            Commands::Resize { clips, height, crop } => {
                assert_eq!(clips, vec![ClipId(1), ClipId(2)]);
                assert_eq!(height, 720);
                assert_eq!(crop, Some((16, 9)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["clip-augment", "detach"]).is_err());
        assert!(Cli::try_parse_from(["clip-augment", "merge", "abc", "12"]).is_err());
        assert!(Cli::try_parse_from(["clip-augment", "resize", "1", "--height", "720", "--crop", "wide"]).is_err());
    }

    #[test]
    fn test_output_path_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), &dir.path().join("out"));
        let path = config.output_path("95_merge_12.mp4").unwrap();
        assert_eq!(path, dir.path().join("out/95_merge_12.mp4"));
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_resolve_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), &dir.path().join("out"));

        let path = config.resolve_output(Path::new("sirens/3_loud.mp4")).unwrap();
        assert_eq!(path, dir.path().join("out/sirens/3_loud.mp4"));
        assert!(dir.path().join("out/sirens").is_dir());

        let absolute = dir.path().join("elsewhere/3.mp4");
        assert_eq!(config.resolve_output(&absolute).unwrap(), absolute);
        assert!(dir.path().join("elsewhere").is_dir());
    }
}
