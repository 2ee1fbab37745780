use super::mux::EncodeSettings;
use crate::error::{ClipError, ClipResult};
use crate::utils::{ffmpeg_base_args, run_ffmpeg};

use std::ffi::OsString;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResizePlan {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop: Option<(u32, u32)>,
}

/// Largest width or height the encoders accept.
pub const MAX_DIMENSION: u32 = 16384;

// h.264 with yuv420p needs even dimensions
fn even_dimension(value: f64, round: fn(f64) -> f64) -> ClipResult<u32> {
    let half = round(value / 2.0);
    if !half.is_finite() || half * 2.0 > f64::from(MAX_DIMENSION) {
        return Err(ClipError::InvalidResize(format!("{value:.0} pixels is beyond the {MAX_DIMENSION} limit")));
    }
    Ok((half as u32 * 2).max(2))
}

fn round_even(value: f64) -> ClipResult<u32> {
    even_dimension(value, f64::round)
}

fn floor_even(value: f64) -> ClipResult<u32> {
    even_dimension(value, f64::floor)
}

impl ResizePlan {
    /// Scales to `target_height` keeping the source aspect ratio, then
    /// optionally centre-crops to the widest `aw:ah` box that fits.
    pub fn new(src_width: u32, src_height: u32, target_height: u32, crop_aspect: Option<(u32, u32)>) -> ClipResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(ClipError::InvalidResize(format!("source is {src_width}x{src_height}")));
        }
        if target_height == 0 || target_height % 2 != 0 || target_height > MAX_DIMENSION {
            return Err(ClipError::InvalidResize(format!(
                "height must be even and between 2 and {MAX_DIMENSION}, got {target_height}"
            )));
        }

        let scaled_height = target_height;
        let scaled_width = round_even(f64::from(src_width) * f64::from(target_height) / f64::from(src_height))?;

        let crop = match crop_aspect {
            None => None,
            Some((aw, ah)) if aw == 0 || ah == 0 || aw > MAX_DIMENSION || ah > MAX_DIMENSION => {
                return Err(ClipError::InvalidResize(format!("crop aspect {aw}:{ah}")));
            }
            Some((aw, ah)) => {
                let full_height_width = f64::from(scaled_height) * f64::from(aw) / f64::from(ah);
                let (crop_width, crop_height) = if full_height_width > f64::from(scaled_width) {
                    // frame is narrower than the aspect, trim top and bottom instead
                    (scaled_width, floor_even(f64::from(scaled_width) * f64::from(ah) / f64::from(aw))?)
                } else {
                    (floor_even(full_height_width)?, scaled_height)
                };
                if (crop_width, crop_height) == (scaled_width, scaled_height) {
                    None
                } else {
                    Some((crop_width, crop_height))
                }
            }
        };

        Ok(ResizePlan { scaled_width, scaled_height, crop })
    }

    pub fn output_size(&self) -> (u32, u32) {
        self.crop.unwrap_or((self.scaled_width, self.scaled_height))
    }

    pub fn filter(&self) -> String {
        let scale = format!("scale={}:{}", self.scaled_width, self.scaled_height);
        match self.crop {
            Some((width, height)) => format!("{scale},crop={width}:{height}"),
            None => scale,
        }
    }
}

pub fn parse_aspect(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s.split_once(':').ok_or_else(|| format!("expected W:H, got {s}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 || w > MAX_DIMENSION || h > MAX_DIMENSION {
        return Err(format!("aspect components must be between 1 and {MAX_DIMENSION}, got {s}"));
    }
    Ok((w, h))
}

pub fn resize_args(source: &Path, output: &Path, plan: &ResizePlan, encode: &EncodeSettings) -> Vec<OsString> {
    // filtering forces a re-encode, so a "copy" video codec falls back to the default encoder
    let video_codec = if encode.video_codec == "copy" {
        EncodeSettings::default().video_codec
    } else {
        encode.video_codec.clone()
    };

    let mut args = ffmpeg_base_args();
    args.push("-i".into());
    args.push(source.into());
    for arg in ["-vf".to_string(), plan.filter(), "-c:v".to_string(), video_codec, "-c:a".to_string(), "copy".to_string()] {
        args.push(arg.into());
    }
    args.push("-movflags".into());
    args.push("+faststart".into());
    args.push(output.into());
    args
}

pub fn resize(source: &Path, output: &Path, plan: &ResizePlan, encode: &EncodeSettings) -> ClipResult<()> {
    run_ffmpeg(&resize_args(source, output, plan, encode))
}
