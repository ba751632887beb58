//! Output module for delivering discovered entries
//!
//! This module handles:
//! - The `ResultSink` contract and its console, JSON-lines, and CSV realizations
//! - Post-processing JSON-lines files into a JSON array
//! - Recording and printing run statistics

pub mod clean;
mod console;
mod csv_output;
mod json_output;
pub mod stats;
mod traits;

pub use clean::{clean_json_lines, clean_output_path, CleanReport};
pub use console::ConsoleSink;
pub use csv_output::CsvSink;
pub use json_output::JsonLinesSink;
pub use stats::{print_statistics, RunStatistics, StatsSnapshot};
pub use traits::{MemorySink, ResultSink, SinkError, SinkResult};

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Permissions for files created by sinks (owner read/write)
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o600;

fn options() -> OpenOptions {
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_MODE);
    }
    options
}

/// Opens `path` for appending, creating it if needed
///
/// # Returns
///
/// * `Ok((File, bool))` - The file, and whether it existed before opening
/// * `Err(SinkError::Open)` - The file could not be opened
pub(crate) fn open_output(path: &Path) -> SinkResult<(File, bool)> {
    let existed = path.exists();
    let file = options()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((file, existed))
}

/// Opens `path` for writing from scratch, creating it if needed
pub(crate) fn open_output_truncated(path: &Path) -> SinkResult<(File, bool)> {
    let existed = path.exists();
    let file = options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((file, existed))
}

/// Appends `.{extension}` unless the file name already ends with it
///
/// # Example
///
/// ```
/// use paste_trawler::output::with_extension;
/// use std::path::PathBuf;
///
/// assert_eq!(with_extension("results", "json"), PathBuf::from("results.json"));
/// assert_eq!(with_extension("results.json", "json"), PathBuf::from("results.json"));
/// ```
pub fn with_extension(path: impl AsRef<Path>, extension: &str) -> PathBuf {
    let path = path.as_ref();
    let suffix = format!(".{}", extension);
    if path.to_string_lossy().ends_with(&suffix) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }
}
