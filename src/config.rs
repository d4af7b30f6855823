//! Configuration management for directory conversion

use crate::error::{ConvertError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do when a single file fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the walk at the first failure and return the error.
    Abort,
    /// Log the failure, record it in the report and keep going.
    #[default]
    Skip,
}

impl FailurePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root_dir: PathBuf,
    pub input_formats: Vec<String>,
    pub output_format: String,
    pub policy: FailurePolicy,
    pub dry_run: bool,
    pub keep_originals: bool,
    pub verbose: bool,
    pub codec: CodecConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub ffmpeg_path: PathBuf,
    /// ffmpeg `-loglevel` value
    pub log_level: String,
    pub bitrate_kbps: Option<u32>,
    pub extra_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            input_formats: vec!["m4a".to_string(), "wav".to_string()],
            output_format: "mp3".to_string(),
            policy: FailurePolicy::default(),
            dry_run: false,
            keep_originals: false,
            verbose: false,
            codec: CodecConfig::default(),
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            log_level: "error".to_string(),
            bitrate_kbps: None,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "convert-audio", about = "Recursively convert audio files and remove the originals", version, author)]
pub struct Args {
    #[arg(help = "Root directory to walk (default: current directory)")]
    pub root: Option<PathBuf>,

    #[arg(short = 'i', long = "input-format", help = "Input format to convert, repeatable (default: m4a, wav)")]
    pub input_formats: Vec<String>,

    #[arg(short = 'o', long = "output-format", help = "Output format (default: mp3)")]
    pub output_format: Option<String>,

    #[arg(long = "policy", value_enum, help = "What to do when a file fails to convert")]
    pub policy: Option<FailurePolicy>,

    #[arg(short = 'n', long = "dry-run", help = "List the conversions without running them")]
    pub dry_run: bool,

    #[arg(short = 'k', long = "keep-originals", help = "Do not delete input files after conversion")]
    pub keep_originals: bool,

    #[arg(long = "ffmpeg", help = "Path to the ffmpeg executable")]
    pub ffmpeg: Option<PathBuf>,

    #[arg(short = 'b', long = "bitrate", help = "Output audio bitrate (kbps)")]
    pub bitrate: Option<u32>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "write-default-config", help = "Write a default config file to this path and exit")]
    pub write_default_config: Option<PathBuf>,

    #[arg(long = "check", help = "Validate configuration and codec availability, then exit")]
    pub check: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(root) = args.root {
            config.root_dir = root;
        }
        if !args.input_formats.is_empty() {
            config.input_formats = args.input_formats;
        }
        if let Some(output_format) = args.output_format {
            config.output_format = output_format;
        }
        if let Some(policy) = args.policy {
            config.policy = policy;
        }
        if let Some(ffmpeg) = args.ffmpeg {
            config.codec.ffmpeg_path = ffmpeg;
        }
        if args.bitrate.is_some() {
            config.codec.bitrate_kbps = args.bitrate;
        }
        config.dry_run |= args.dry_run;
        config.keep_originals |= args.keep_originals;
        config.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConvertError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_formats.is_empty() {
            return Err(ConvertError::config("At least one input format is required"));
        }

        for format in self.input_formats.iter().chain(std::iter::once(&self.output_format)) {
            validate_format(format)?;
        }

        if self.input_formats.contains(&self.output_format) {
            return Err(ConvertError::config(format!(
                "Output format '{}' cannot also be an input format", self.output_format
            )));
        }

        if let Some(bitrate) = self.codec.bitrate_kbps {
            if !(8..=320).contains(&bitrate) {
                return Err(ConvertError::config("Bitrate must be in range [8, 320] kbps"));
            }
        }

        if self.codec.ffmpeg_path.as_os_str().is_empty() {
            return Err(ConvertError::config("ffmpeg path cannot be empty"));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConvertError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConvertError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

/// Format tags are bare extensions: `mp3`, not `.mp3` or `a/b`.
fn validate_format(format: &str) -> Result<()> {
    if format.is_empty() {
        return Err(ConvertError::config("Format cannot be empty"));
    }
    if format.starts_with('.') {
        return Err(ConvertError::config(format!(
            "Format '{}' must not start with '.'", format
        )));
    }
    if format.chars().any(|c| c == '/' || c == '\\' || c.is_whitespace()) {
        return Err(ConvertError::config(format!(
            "Format '{}' contains invalid characters", format
        )));
    }
    Ok(())
}
