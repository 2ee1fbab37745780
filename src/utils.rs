use crate::error::{ClipError, ClipResult};

use std::ffi::OsString;
use std::process::{Command, Output};

use tracing::debug;

pub fn check_command_result(result: &Output) -> ClipResult<()> {
    match result.status.code() {
        Some(0) => Ok(()),
        status => Err(ClipError::FfmpegFailed {
            status,
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        }),
    }
}

pub fn ensure_ffmpeg() -> ClipResult<()> {
    which::which("ffmpeg").map(|_| ()).map_err(|_| ClipError::FfmpegNotFound)
}

// every invocation overwrites its output and only reports errors
pub fn ffmpeg_base_args() -> Vec<OsString> {
    ["-y", "-nostdin", "-v", "error"].into_iter().map(OsString::from).collect()
}

pub fn run_ffmpeg(args: &[OsString]) -> ClipResult<()> {
    debug!(?args, "running ffmpeg");
    let output = Command::new("ffmpeg").args(args).output()?;
    check_command_result(&output)
}
