mod audio_clip;
mod extract;
mod mix;
mod normalize;

pub use audio_clip::{AudioClip, Sample};
pub use extract::{extract_audio, load_audio_file, load_track, silence_for, AudioFormat};
pub use mix::check_sound_level;
pub use normalize::DEFAULT_TARGET_PEAK;
