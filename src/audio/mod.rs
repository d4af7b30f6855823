//! Audio Codec Module
//!
//! The decode/encode step is delegated to an external codec behind the
//! [`AudioCodec`] trait. WAV headers can be inspected locally for diagnostics.

pub mod codec;
pub mod wav;

pub use codec::{AudioCodec, FfmpegCodec};
pub use wav::WavInfo;
