//! Post-processing for JSON-lines output
//!
//! Turns an appended JSON-lines file into a single pretty-printed JSON
//! array, dropping blank and duplicate lines. Lines that do not parse, such
//! as a torn last line after a forced exit, are skipped with a warning.

use crate::entry::Entry;
use crate::output::traits::{SinkError, SinkResult};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix added to the input file name to form the output name
pub const CLEAN_PREFIX: &str = "clean-";

/// Outcome of a clean pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Where the JSON array was written
    pub output: PathBuf,

    /// Entries written
    pub kept: usize,

    /// Exact duplicate lines removed
    pub duplicates: usize,

    /// Lines that could not be parsed
    pub skipped: usize,
}

/// `dir/results.json` becomes `dir/clean-results.json`
pub fn clean_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", CLEAN_PREFIX, name))
}

/// Rewrites a JSON-lines file as a JSON array beside it
///
/// # Arguments
///
/// * `input` - A file produced by the JSON-lines sink
///
/// # Returns
///
/// * `Ok(CleanReport)` - Counts and the output path
/// * `Err(SinkError)` - The input could not be read or the output written
pub fn clean_json_lines(input: &Path) -> SinkResult<CleanReport> {
    let contents = fs::read_to_string(input).map_err(|source| SinkError::Open {
        path: input.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut duplicates = 0;
    let mut skipped = 0;

    for (number, line) in contents.lines().enumerate() {
        // Older output terminated objects with a comma
        let line = line.trim().trim_end_matches(',');
        if line.is_empty() {
            continue;
        }
        if !seen.insert(line) {
            duplicates += 1;
            continue;
        }
        match serde_json::from_str::<Entry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping line {} of {}: {}", number + 1, input.display(), e);
            }
        }
    }

    let output = clean_output_path(input);
    let (file, _) = crate::output::open_output_truncated(&output)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &entries)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!(
        "Wrote {} entries to {} ({} duplicates, {} unreadable lines)",
        entries.len(),
        output.display(),
        duplicates,
        skipped
    );

    Ok(CleanReport {
        output,
        kept: entries.len(),
        duplicates,
        skipped,
    })
}
