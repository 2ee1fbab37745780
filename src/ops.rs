use crate::audio::{check_sound_level, extract_audio, load_audio_file, load_track, silence_for, AudioClip, Sample};
use crate::cli::Config;
use crate::clip_name::{augment_name, detached_name, equalized_name, merge_name, replaced_name, resized_name, ClipId};
use crate::error::{ClipError, ClipResult};
use crate::locate::{locate_clip, resolve_input};
use crate::merge_log::MergeLog;
use crate::probe::probe;
use crate::video::{mux_audio, resize, ResizePlan};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

/// A single-clip operation that can be run over a list of clip numbers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClipOp {
    Detach,
    Equalize { target_peak: Sample },
    Resize { height: u32, crop: Option<(u32, u32)> },
}

impl ClipOp {
    pub fn run(&self, config: &Config, clip_path: &Path) -> ClipResult<PathBuf> {
        match *self {
            ClipOp::Detach => detach_audio(config, clip_path),
            ClipOp::Equalize { target_peak } => equalize_audio(config, clip_path, target_peak),
            ClipOp::Resize { height, crop } => resize_clip(config, clip_path, height, crop),
        }
    }
}

fn require_file(path: &Path) -> ClipResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ClipError::ClipNotFound { clip: path.display().to_string(), tried: vec![path.to_path_buf()] })
    }
}

// the output may not exist yet, so its parent is resolved instead
fn canonical_output(output: &Path) -> Option<PathBuf> {
    if let Ok(path) = fs::canonicalize(output) {
        return Some(path);
    }
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).ok()?.join(output.file_name()?))
}

fn ensure_not_input(clip_path: &Path, output: &Path) -> ClipResult<()> {
    let same = match (fs::canonicalize(clip_path), canonical_output(output)) {
        (Ok(input), Some(output)) => input == output,
        _ => clip_path == output,
    };
    if same {
        Err(ClipError::OverwritesInput(output.to_path_buf()))
    } else {
        Ok(())
    }
}

// writes the track to a scratch wav and muxes it under the clip's video
fn write_with_audio(config: &Config, clip_path: &Path, track: &AudioClip, output: &Path) -> ClipResult<()> {
    ensure_not_input(clip_path, output)?;

    let scratch = tempfile::tempdir()?;
    let wav = scratch.path().join("mix.wav");
    track.write(&wav)?;
    mux_audio(clip_path, &wav, output, &config.encode)
}

pub fn augment_clip(
    config: &Config,
    clip_path: &Path,
    audio_path: &Path,
    sound_level: f32,
    output: Option<PathBuf>,
) -> ClipResult<PathBuf> {
    check_sound_level(sound_level)?;
    let clip_path = resolve_input(clip_path)?;
    require_file(audio_path)?;

    let output = match output {
        Some(output) => config.resolve_output(&output)?,
        None => config.output_path(&augment_name(ClipId::from_path(&clip_path)?, audio_path))?,
    };

    let info = probe(&clip_path)?;
    let base = load_track(&clip_path, config.audio, &info)?;
    let overlay = load_audio_file(audio_path, config.audio)?;
    let mixed = base.composite(&overlay, sound_level)?;
    write_with_audio(config, &clip_path, &mixed, &output)?;

    info!(clip = %clip_path.display(), audio = %audio_path.display(), sound_level, output = %output.display(), "augmented clip");
    Ok(output)
}

// mixes the secondary's audio into the primary without touching the merge log
pub fn merge_clips(config: &Config, primary: ClipId, secondary: ClipId, sound_level: f32) -> ClipResult<PathBuf> {
    check_sound_level(sound_level)?;
    let primary_path = locate_clip(&config.clips_dir, primary, &config.clip_suffix)?;
    let secondary_path = locate_clip(&config.clips_dir, secondary, &config.clip_suffix)?;
    let output = config.output_path(&merge_name(primary, secondary))?;

    let primary_info = probe(&primary_path)?;
    let secondary_info = probe(&secondary_path)?;
    let base = load_track(&primary_path, config.audio, &primary_info)?;
    let overlay = load_track(&secondary_path, config.audio, &secondary_info)?;
    let mixed = base.composite(&overlay, sound_level)?;
    write_with_audio(config, &primary_path, &mixed, &output)?;

    info!(%primary, %secondary, sound_level, output = %output.display(), "merged clips");
    Ok(output)
}

pub fn merge_audio(
    config: &Config,
    primary: ClipId,
    secondary: ClipId,
    sound_level: f32,
    log: &mut MergeLog,
) -> ClipResult<PathBuf> {
    let output = merge_clips(config, primary, secondary, sound_level)?;
    log.record(primary, secondary)?;
    Ok(output)
}

pub fn replace_audio(config: &Config, clip_path: &Path, audio_path: &Path) -> ClipResult<PathBuf> {
    let clip_path = resolve_input(clip_path)?;
    require_file(audio_path)?;
    let output = config.output_path(&replaced_name(ClipId::from_path(&clip_path)?, audio_path))?;

    let info = probe(&clip_path)?;
    let track = load_audio_file(audio_path, config.audio)?;
    let fitted = track.fit_to(track.samples_for(info.duration_secs));
    write_with_audio(config, &clip_path, &fitted, &output)?;

    info!(clip = %clip_path.display(), audio = %audio_path.display(), output = %output.display(), "replaced audio");
    Ok(output)
}

pub fn detach_audio(config: &Config, clip_path: &Path) -> ClipResult<PathBuf> {
    let clip_path = resolve_input(clip_path)?;
    let output = config.output_path(&detached_name(ClipId::from_path(&clip_path)?))?;
    ensure_not_input(&clip_path, &output)?;

    let info = probe(&clip_path)?;
    if info.has_audio {
        extract_audio(&clip_path, &output, config.audio)?;
    } else {
        silence_for(config.audio, info.duration_secs).write(&output)?;
    }

    info!(clip = %clip_path.display(), output = %output.display(), "detached audio");
    Ok(output)
}

pub fn equalize_audio(config: &Config, clip_path: &Path, target_peak: Sample) -> ClipResult<PathBuf> {
    let clip_path = resolve_input(clip_path)?;
    let output = config.output_path(&equalized_name(ClipId::from_path(&clip_path)?))?;

    let info = probe(&clip_path)?;
    let track = load_track(&clip_path, config.audio, &info)?;
    let before = track.peak();
    let normalized = track.normalize(target_peak)?;
    write_with_audio(config, &clip_path, &normalized, &output)?;

    info!(
        clip = %clip_path.display(),
        duration = track.duration(),
        peak_before = before,
        target_peak,
        output = %output.display(),
        "equalized audio"
    );
    Ok(output)
}

pub fn resize_clip(config: &Config, clip_path: &Path, height: u32, crop: Option<(u32, u32)>) -> ClipResult<PathBuf> {
    let clip_path = resolve_input(clip_path)?;
    let output = config.output_path(&resized_name(ClipId::from_path(&clip_path)?, height))?;
    ensure_not_input(&clip_path, &output)?;

    let info = probe(&clip_path)?;
    let plan = ResizePlan::new(info.width, info.height, height, crop)?;
    resize(&clip_path, &output, &plan, &config.encode)?;

    let (width, height) = plan.output_size();
    info!(
        clip = %clip_path.display(),
        from = %format!("{}x{}", info.width, info.height),
        fps = info.fps,
        to = %format!("{width}x{height}"),
        output = %output.display(),
        "resized clip"
    );
    Ok(output)
}
