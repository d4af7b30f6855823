//! WAV header inspection

use std::path::Path;
use hound::{SampleFormat, WavReader};
use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    /// Frames per channel
    pub total_frames: u32,
    pub duration: f64,
}

impl WavInfo {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .map_err(|e| ConvertError::audio(format!(
                "Cannot read WAV header of {}: {}", path.display(), e
            )))?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(ConvertError::audio(format!("Invalid sample rate in {}", path.display())));
        }

        // duration() is already per channel
        let total_frames = reader.duration();

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.sample_format,
            total_frames,
            duration: total_frames as f64 / spec.sample_rate as f64,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_frames == 0
    }
}

impl std::fmt::Display for WavInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let format = match self.sample_format {
            SampleFormat::Int => "int",
            SampleFormat::Float => "float",
        };
        write!(
            f,
            "{} Hz, {} ch, {}-bit {}, {:.2}s",
            self.sample_rate, self.channels, self.bits_per_sample, format, self.duration
        )
    }
}
