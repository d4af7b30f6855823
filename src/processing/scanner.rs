//! Finding convertible files and deriving their output paths

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{ConvertError, Result};

/// One file to convert. Lives only for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_format: String,
    pub output_format: String,
}

/// First input format whose `.<format>` suffix ends `filename`. Case-sensitive.
///
/// Works on the raw file name, so names that are not valid UTF-8 still match.
pub fn matching_format<'a, S: AsRef<OsStr> + ?Sized>(
    filename: &S,
    input_formats: &'a [String],
) -> Option<&'a str> {
    let filename = filename.as_ref();
    input_formats
        .iter()
        .map(String::as_str)
        .find(|format| has_suffix(filename, format))
}

pub fn should_convert<S: AsRef<OsStr> + ?Sized>(filename: &S, input_formats: &[String]) -> bool {
    matching_format(filename, input_formats).is_some()
}

/// Replaces the trailing `.<input_format>` of `filename` and joins it onto `folder`.
///
/// Only the final suffix is replaced, so `a.m4a.m4a` becomes `a.m4a.mp3`.
/// A filename without the suffix just gets `.<output_format>` appended.
pub fn derive_output_path<S: AsRef<OsStr> + ?Sized>(
    filename: &S,
    folder: &Path,
    input_format: &str,
    output_format: &str,
) -> PathBuf {
    let filename = filename.as_ref();
    let mut name = if has_suffix(filename, input_format) {
        let bytes = filename.as_encoded_bytes();
        let stem = &bytes[..bytes.len() - input_format.len() - 1];
        // SAFETY: the split is immediately before `.<input_format>`, a
        // non-empty UTF-8 substring, which keeps both halves valid encodings.
        unsafe { OsStr::from_encoded_bytes_unchecked(stem) }.to_os_string()
    } else {
        filename.to_os_string()
    };
    name.push(".");
    name.push(output_format);
    folder.join(name)
}

fn has_suffix(filename: &OsStr, format: &str) -> bool {
    filename
        .as_encoded_bytes()
        .strip_suffix(format.as_bytes())
        .is_some_and(|rest| rest.ends_with(b"."))
}

/// Walks `root` and builds a job for every regular file that should be converted.
///
/// Entries are visited sorted by file name within each directory. Symlinks
/// are not followed. An unreadable root is an error; anything unreadable
/// below it is logged and skipped.
pub fn scan_directory(
    root: &Path,
    input_formats: &[String],
    output_format: &str,
) -> Result<Vec<ConversionJob>> {
    let mut jobs = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(ConvertError::Walk(e)),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name();
        let Some(input_format) = matching_format(filename, input_formats) else {
            continue;
        };

        let folder = entry.path().parent().unwrap_or(root);
        jobs.push(ConversionJob {
            input_path: entry.path().to_path_buf(),
            output_path: derive_output_path(filename, folder, input_format, output_format),
            input_format: input_format.to_string(),
            output_format: output_format.to_string(),
        });
    }

    Ok(jobs)
}

/// Output paths claimed by more than one job, with every input that maps there.
///
/// Only the last of those conversions survives, since each one overwrites the output.
pub fn output_collisions(jobs: &[ConversionJob]) -> Vec<(&Path, Vec<&Path>)> {
    let mut by_output: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for job in jobs {
        by_output
            .entry(job.output_path.as_path())
            .or_default()
            .push(job.input_path.as_path());
    }

    let mut collisions: Vec<_> = by_output
        .into_iter()
        .filter(|(_, inputs)| inputs.len() > 1)
        .collect();
    collisions.sort();
    collisions
}
