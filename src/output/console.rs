//! Console sink: one `service: link` line per entry

use crate::entry::Entry;
use crate::output::traits::{ResultSink, SinkResult};
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

/// Writes `"{service}: {link}"` lines to any writer (stdout in production)
pub struct ConsoleSink<W: Write + Send = Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> ResultSink for ConsoleSink<W> {
    fn deliver(&self, entries: &[Entry]) -> usize {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let mut written = 0;

        for entry in entries {
            match writeln!(writer, "{}", entry) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!("Dropping {}: {}", entry.link, e),
            }
        }

        if let Err(e) = writer.flush() {
            tracing::warn!("Failed to flush console output: {}", e);
        }
        written
    }

    fn finish(&self) -> SinkResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.flush()?;
        Ok(())
    }
}
