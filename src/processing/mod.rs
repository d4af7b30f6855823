//! Directory Conversion Module
//!
//! Scans a directory tree for convertible files and runs each one through
//! the codec, one file at a time.

pub mod converter;
pub mod scanner;

pub use converter::{ConversionReport, DirectoryConverter, FailedConversion};
pub use scanner::{ConversionJob, derive_output_path, matching_format, scan_directory, should_convert};
