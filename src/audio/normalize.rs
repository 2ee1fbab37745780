use super::audio_clip::{AudioClip, Sample};
use crate::error::{ClipError, ClipResult};

pub const DEFAULT_TARGET_PEAK: Sample = 1.0;

impl AudioClip {
    // scales the whole clip so its loudest sample sits at `target_peak`
    // silent clips have nothing to scale and are returned as is
    pub fn normalize(&self, target_peak: Sample) -> ClipResult<Self> {
        if !(target_peak.is_finite() && target_peak > 0.0 && target_peak <= 1.0) {
            return Err(ClipError::InvalidSoundLevel(target_peak));
        }

        let peak = self.peak();
        if peak == 0.0 {
            return Ok(self.clone());
        }
        self.gain(target_peak / peak)
    }
}
