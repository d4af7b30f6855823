//! Directory converter
//!
//! Runs every planned [`ConversionJob`] through an [`AudioCodec`], verifies the
//! output and removes the original. Failures are handled according to the
//! configured [`FailurePolicy`].

use std::path::{Path, PathBuf};
use std::time::Instant;
use crate::audio::{AudioCodec, WavInfo};
use crate::config::{Config, FailurePolicy};
use crate::error::{ConvertError, Result};
use crate::processing::scanner::{ConversionJob, output_collisions, scan_directory};

#[derive(Debug, Clone)]
pub struct FailedConversion {
    pub input_path: PathBuf,
    pub error: String,
}

/// Outcome of one walk.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// Jobs that finished. In a dry run, the jobs that would have run.
    pub converted: Vec<ConversionJob>,
    pub failed: Vec<FailedConversion>,
    pub dry_run: bool,
    pub elapsed_secs: f64,
}

impl ConversionReport {
    pub fn planned(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.dry_run {
            return write!(f, "{} file(s) would be converted", self.converted.len());
        }
        write!(
            f,
            "{} converted, {} failed in {:.2}s",
            self.converted.len(),
            self.failed.len(),
            self.elapsed_secs
        )
    }
}

pub struct DirectoryConverter<C: AudioCodec> {
    config: Config,
    codec: C,
}

impl<C: AudioCodec> DirectoryConverter<C> {
    pub fn new(config: Config, codec: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, codec })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Converts every matching file under the configured root.
    pub fn run(&self) -> Result<ConversionReport> {
        self.walk_and_convert(
            &self.config.root_dir,
            &self.config.input_formats,
            &self.config.output_format,
        )
    }

    /// Converts every file under `root_dir` that ends with one of `input_formats`.
    ///
    /// All jobs are planned before the first conversion, so files written
    /// during the walk are never picked up again. Under
    /// [`FailurePolicy::Abort`] the first failure is returned and the remaining
    /// files are left untouched.
    pub fn walk_and_convert(
        &self,
        root_dir: &Path,
        input_formats: &[String],
        output_format: &str,
    ) -> Result<ConversionReport> {
        let start_time = Instant::now();
        let jobs = scan_directory(root_dir, input_formats, output_format)?;

        log::info!(
            "Found {} file(s) to convert under {}",
            jobs.len(),
            root_dir.display()
        );

        for (output, inputs) in output_collisions(&jobs) {
            let inputs: Vec<_> = inputs.iter().map(|p| p.display().to_string()).collect();
            log::warn!(
                "{} is the output of {} files ({}); only the last conversion is kept",
                output.display(),
                inputs.len(),
                inputs.join(", ")
            );
        }

        let mut report = ConversionReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        if self.config.dry_run {
            for job in jobs {
                log::info!("Would convert {} -> {}", job.input_path.display(), job.output_path.display());
                report.converted.push(job);
            }
            return Ok(report);
        }

        if !jobs.is_empty() {
            self.codec.validate()?;
        }

        for job in jobs {
            match self.convert_file(&job) {
                Ok(()) => report.converted.push(job),
                Err(e) if self.config.policy == FailurePolicy::Skip && e.is_per_file() => {
                    log::error!("{}", e);
                    report.failed.push(FailedConversion {
                        input_path: job.input_path,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        report.elapsed_secs = start_time.elapsed().as_secs_f64();
        log::info!("{}", report);
        Ok(report)
    }

    /// Converts one file and removes the input once the output is verified.
    pub fn convert_file(&self, job: &ConversionJob) -> Result<()> {
        log::info!("Converting {} -> {}", job.input_path.display(), job.output_path.display());

        if job.input_format == "wav" {
            match WavInfo::read(&job.input_path) {
                Ok(info) if info.is_empty() => {
                    log::warn!("{} has no audio frames", job.input_path.display())
                }
                Ok(info) => log::debug!("{}: {}", job.input_path.display(), info),
                Err(e) => log::debug!("{}", e),
            }
        }

        if job.output_path.exists() {
            log::warn!("Overwriting existing file {}", job.output_path.display());
        }

        self.codec.transcode(job)?;
        verify_output(&job.output_path)?;

        if self.config.keep_originals {
            log::debug!("Keeping original {}", job.input_path.display());
        } else {
            std::fs::remove_file(&job.input_path)?;
        }
        Ok(())
    }
}

/// The output must be a regular, non-empty file before the input may go.
pub fn verify_output(path: &Path) -> Result<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConvertError::output_invalid(path, "file was not created"));
        }
        Err(e) => return Err(ConvertError::output_invalid(path, e.to_string())),
    };

    if !metadata.is_file() {
        return Err(ConvertError::output_invalid(path, "not a regular file"));
    }
    if metadata.len() == 0 {
        return Err(ConvertError::output_invalid(path, "file is empty"));
    }
    Ok(())
}
