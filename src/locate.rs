use crate::clip_name::{input_stem, ClipId};
use crate::error::{ClipError, ClipResult};

use std::path::{Path, PathBuf};

use tracing::debug;

pub const PRIMARY_EXTENSION: &str = "mp4";
pub const FALLBACK_EXTENSIONS: [&str; 1] = ["mov"];

fn candidate_extensions() -> impl Iterator<Item = &'static str> {
    std::iter::once(PRIMARY_EXTENSION).chain(FALLBACK_EXTENSIONS)
}

// finds `{dir}/{id}{suffix}.mp4`, falling back to the other camera's .mov
pub fn locate_clip(dir: &Path, clip: ClipId, suffix: &str) -> ClipResult<PathBuf> {
    let stem = input_stem(clip, suffix);
    let mut tried = Vec::new();
    for ext in candidate_extensions() {
        let path = dir.join(&stem).with_extension(ext);
        if path.is_file() {
            debug!(clip = %clip, path = %path.display(), "located clip");
            return Ok(path);
        }
        tried.push(path);
    }
    Err(ClipError::ClipNotFound { clip: clip.to_string(), tried })
}

// an explicit path that exists wins; otherwise the same stem is retried with each known extension
pub fn resolve_input(path: &Path) -> ClipResult<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let mut tried = vec![path.to_path_buf()];
    for ext in candidate_extensions() {
        let candidate = path.with_extension(ext);
        if candidate == path {
            continue;
        }
        if candidate.is_file() {
            debug!(requested = %path.display(), found = %candidate.display(), "using fallback extension");
            return Ok(candidate);
        }
        tried.push(candidate);
    }
    Err(ClipError::ClipNotFound { clip: path.display().to_string(), tried })
}
