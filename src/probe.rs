use crate::error::{ClipError, ClipResult};

use std::path::Path;

use ffmpeg_next::{codec, format, media};
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    pub fps: f64,
    pub has_audio: bool,
}

pub fn probe(path: &Path) -> ClipResult<MediaInfo> {
    ffmpeg_next::init()?;

    let source = format::input(path)?;
    let video = source
        .streams()
        .best(media::Type::Video)
        .ok_or_else(|| ClipError::NoVideoStream(path.to_path_buf()))?;

    // dimensions come from a decoder built off the stream parameters
    let decoder = codec::context::Context::from_parameters(video.parameters())?
        .decoder()
        .video()?;

    let fps = video.avg_frame_rate();
    let fps = if fps.denominator() == 0 { 0.0 } else { f64::from(fps) };

    let duration_secs = if source.duration() > 0 {
        source.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        // containers without a global duration still carry one on the stream
        video.duration().max(0) as f64 * f64::from(video.time_base())
    };

    let info = MediaInfo {
        width: decoder.width(),
        height: decoder.height(),
        duration_secs,
        fps,
        has_audio: source.streams().best(media::Type::Audio).is_some(),
    };
    debug!(path = %path.display(), ?info, "probed clip");
    Ok(info)
}
