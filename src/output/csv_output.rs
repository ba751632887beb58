//! CSV sink
//!
//! Rows follow `Entry::FIELDS`. The header row is written only when the
//! file is created, so repeated runs append to one table.

use crate::entry::Entry;
use crate::output::open_output;
use crate::output::traits::{ResultSink, SinkResult};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Opens `path` for appending, writing the header if the file is new
    pub fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (file, existed) = open_output(&path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if !existed {
            writer.write_record(Entry::FIELDS)?;
            writer.flush()?;
        }

        tracing::info!("Writing CSV rows to {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    fn deliver(&self, entries: &[Entry]) -> usize {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let mut written = 0;

        for entry in entries {
            match writer.write_record(entry.to_record()) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!("Dropping {}: {}", entry.link, e),
            }
        }

        if let Err(e) = writer.flush() {
            tracing::warn!("Failed to flush {}: {}", self.path.display(), e);
        }
        written
    }

    fn finish(&self) -> SinkResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}
