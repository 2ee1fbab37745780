use crate::error::{ClipError, ClipResult};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The number a clip file name starts with, e.g. `95` for `95clip.mp4`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClipId(pub u32);

impl ClipId {
    pub fn from_path(path: &Path) -> ClipResult<ClipId> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| ClipError::InvalidClipName(path.display().to_string()))?;
        stem.parse()
    }

    /// Parses a bare clip number, rejecting any suffix.
    pub fn parse_exact(s: &str) -> ClipResult<ClipId> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClipError::InvalidClipName(s.to_string()));
        }
        s.parse::<u32>().map(ClipId).map_err(|_| ClipError::InvalidClipName(s.to_string()))
    }
}

impl FromStr for ClipId {
    type Err = ClipError;

    // only the leading digits matter; anything after them is a suffix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits
            .parse::<u32>()
            .map(ClipId)
            .map_err(|_| ClipError::InvalidClipName(s.to_string()))
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn audio_stem(audio: &Path) -> String {
    audio
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string())
}

pub fn input_stem(clip: ClipId, suffix: &str) -> String {
    format!("{clip}{suffix}")
}

pub fn merge_name(primary: ClipId, secondary: ClipId) -> String {
    format!("{primary}_merge_{secondary}.mp4")
}

pub fn augment_name(clip: ClipId, audio: &Path) -> String {
    format!("{clip}_aug_{}.mp4", audio_stem(audio))
}

pub fn replaced_name(clip: ClipId, audio: &Path) -> String {
    format!("{clip}_replace_{}.mp4", audio_stem(audio))
}

pub fn equalized_name(clip: ClipId) -> String {
    format!("{clip}_eq.mp4")
}

pub fn resized_name(clip: ClipId, height: u32) -> String {
    format!("{clip}_{height}p.mp4")
}

pub fn detached_name(clip: ClipId) -> String {
    format!("{clip}.wav")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_clip_ids() {
        assert_eq!(ClipId::from_path(Path::new("95clip.mp4")).unwrap(), ClipId(95));
        assert_eq!(ClipId::from_path(Path::new("12.mov")).unwrap(), ClipId(12));
        assert_eq!(ClipId::from_path(Path::new("7_eq.mp4")).unwrap(), ClipId(7));
        assert_eq!(ClipId::from_path(&PathBuf::from("equalized_clips/300clip_720p.mp4")).unwrap(), ClipId(300));
    }

    #[test]
    fn test_reject_names_without_number() {
        assert!(matches!(ClipId::from_path(Path::new("clip95.mp4")), Err(ClipError::InvalidClipName(_))));
        assert!(matches!("".parse::<ClipId>(), Err(ClipError::InvalidClipName(_))));
        // too large for a u32
        assert!("99999999999clip".parse::<ClipId>().is_err());
    }

    #[test]
    fn test_parse_exact() {
        assert_eq!(ClipId::parse_exact("95").unwrap(), ClipId(95));
        assert_eq!(ClipId::parse_exact("007").unwrap(), ClipId(7));
        assert!(ClipId::parse_exact("95clip").is_err());
        assert!(ClipId::parse_exact("95x").is_err());
        assert!(ClipId::parse_exact("+95").is_err());
        assert!(ClipId::parse_exact("").is_err());
        assert!(ClipId::parse_exact("99999999999").is_err());
        // the lenient form still reads suffixed ids
        assert_eq!("95x".parse::<ClipId>().unwrap(), ClipId(95));
    }

    #[test]
    fn test_output_names() {
        let siren = Path::new("sounds/siren_01.wav");
        assert_eq!(merge_name(ClipId(95), ClipId(12)), "95_merge_12.mp4");
        assert_eq!(augment_name(ClipId(95), siren), "95_aug_siren_01.mp4");
        assert_eq!(replaced_name(ClipId(3), siren), "3_replace_siren_01.mp4");
        assert_eq!(equalized_name(ClipId(4)), "4_eq.mp4");
        assert_eq!(resized_name(ClipId(4), 720), "4_720p.mp4");
        assert_eq!(detached_name(ClipId(4)), "4.wav");
        assert_eq!(input_stem(ClipId(95), "clip"), "95clip");
    }
}
