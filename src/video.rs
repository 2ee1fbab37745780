mod mux;
mod resize;

pub use mux::{mux_audio, EncodeSettings};
pub use resize::{parse_aspect, resize, ResizePlan};
