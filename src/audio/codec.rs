//! External codec invocation

use std::ffi::OsString;
use std::process::{Command, Stdio};
use crate::config::CodecConfig;
use crate::error::{ConvertError, Result};
use crate::processing::ConversionJob;

/// Lines of ffmpeg stderr kept in a codec error.
const STDERR_TAIL_LINES: usize = 5;

/// Decodes one audio file and encodes it to another format.
pub trait AudioCodec {
    fn name(&self) -> &str;

    /// Checks that the codec can be used at all.
    fn validate(&self) -> Result<()>;

    /// Writes `job.output_path`, overwriting any existing file.
    fn transcode(&self, job: &ConversionJob) -> Result<()>;
}

/// Codec backed by the `ffmpeg` executable.
pub struct FfmpegCodec {
    config: CodecConfig,
}

impl FfmpegCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Paths are passed through unchanged, so non-UTF-8 names survive.
    fn build_args(&self, job: &ConversionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(job.input_path.clone().into_os_string());

        if let Some(bitrate) = self.config.bitrate_kbps {
            args.push(OsString::from("-b:a"));
            args.push(OsString::from(format!("{}k", bitrate)));
        }

        args.push(OsString::from("-loglevel"));
        args.push(OsString::from(&self.config.log_level));
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args.push(OsString::from("-f"));
        args.push(OsString::from(muxer_name(&job.output_format)));
        args.push(job.output_path.clone().into_os_string());
        args
    }

    fn spawn_error(&self, err: std::io::Error) -> ConvertError {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConvertError::CodecNotFound { path: self.config.ffmpeg_path.clone() }
        } else {
            ConvertError::Io(err)
        }
    }
}

impl AudioCodec for FfmpegCodec {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn validate(&self) -> Result<()> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ConvertError::config(format!(
                "{} -version exited with {}", self.config.ffmpeg_path.display(), output.status
            )));
        }

        if let Some(line) = String::from_utf8_lossy(&output.stdout).lines().next() {
            log::debug!("{}", line);
        }
        Ok(())
    }

    fn transcode(&self, job: &ConversionJob) -> Result<()> {
        let args = self.build_args(job);
        let command_line: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
        log::debug!("{} {}", self.config.ffmpeg_path.display(), command_line.join(" "));

        let output = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ConvertError::codec(
            &job.input_path,
            format!("ffmpeg exited with {}: {}", output.status, stderr_tail(&stderr)),
        ))
    }
}

/// ffmpeg muxer for an output format tag.
pub fn muxer_name(format: &str) -> &str {
    match format {
        "m4a" => "ipod",
        "aac" => "adts",
        other => other,
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join(" | ");
    if tail.is_empty() { "no error output".to_string() } else { tail }
}
