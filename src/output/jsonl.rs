//! JSON Lines export
//!
//! One `{"content": ..., "source": ...}` object per line, the shape the
//! chunking and indexing tools downstream read.

use crate::crawler::Document;
use crate::output::CrawlStats;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Streams documents to a writer as JSON Lines
pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl JsonlWriter<File> {
    /// Creates (or truncates) `path` for writing
    pub fn create(path: &Path) -> Result<Self, HarvestError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Appends one document as a single line
    pub fn write_document(&mut self, document: &Document) -> Result<(), HarvestError> {
        serde_json::to_writer(&mut self.writer, document)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flushes buffered output and returns the document count
    pub fn finish(mut self) -> Result<usize, HarvestError> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Writes every document in `documents` to `writer`
pub fn write_jsonl<W: Write>(documents: &[Document], writer: W) -> Result<usize, HarvestError> {
    let mut out = JsonlWriter::new(writer);
    for document in documents {
        out.write_document(document)?;
    }
    out.finish()
}

/// Writes the crawl statistics as pretty-printed JSON
pub fn write_summary(stats: &CrawlStats, path: &Path) -> Result<(), HarvestError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, stats)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
