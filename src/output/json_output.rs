//! JSON-lines sink
//!
//! Each entry is appended as one compact JSON object per line. The stream
//! is not itself a JSON document; `clean` turns it into one.

use crate::entry::Entry;
use crate::output::open_output;
use crate::output::traits::{ResultSink, SinkResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Opens `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (file, _) = open_output(&path)?;
        tracing::info!("Writing JSON lines to {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes an entry as one newline-terminated line
fn encode_line(entry: &Entry) -> SinkResult<Vec<u8>> {
    let mut line = serde_json::to_vec(entry)?;
    line.push(b'\n');
    Ok(line)
}

impl ResultSink for JsonLinesSink {
    fn deliver(&self, entries: &[Entry]) -> usize {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let mut written = 0;

        for entry in entries {
            let result = encode_line(entry).and_then(|line| Ok(writer.write_all(&line)?));
            match result {
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
