//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Audio error: {message}")]
    Audio { message: String },

    /// The codec executable could not be started.
    #[error("Codec not found at path: {}", path.display())]
    CodecNotFound { path: PathBuf },

    /// Decode or encode of a single file failed.
    #[error("Failed to convert {}: {message}", path.display())]
    Codec { path: PathBuf, message: String },

    /// The codec reported success but left no usable output.
    #[error("Output {} is invalid: {reason}", path.display())]
    OutputInvalid { path: PathBuf, reason: String },
}

impl ConvertError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }

    pub fn codec<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self::Codec { path: path.into(), message: msg.into() }
    }

    pub fn output_invalid<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::OutputInvalid { path: path.into(), reason: reason.into() }
    }

    /// Errors that concern a single file rather than the whole run.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Codec { .. } | Self::OutputInvalid { .. } | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
