use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use shared::{AppError, AppResult};
use smear::ParticleRecord;
use tracing::debug;

use crate::format::format_record;

/// Destination for accepted particle records, written in call order.
pub trait RecordSink {
    fn write_record(&mut self, record: &ParticleRecord) -> AppResult<()>;

    /// Flush anything buffered. Called once after the last record.
    fn finish(&mut self) -> AppResult<()>;

    fn records_written(&self) -> u64;
}

/// Writes beam file lines to any `Write`.
#[derive(Debug)]
pub struct BeamFileWriter<W: Write> {
    inner: W,
    path: PathBuf,
    written: u64,
}

impl BeamFileWriter<BufWriter<File>> {
    /// Create (or truncate) the beam file at `path`.
    pub fn create(path: &Path) -> AppResult<Self> {
        let file = File::create(path).map_err(|err| AppError::sink(path, err))?;
        debug!(path = ?path, "opened beam file");
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl BeamFileWriter<Vec<u8>> {
    /// Keep lines in memory, for tests and previews.
    pub fn in_memory() -> Self {
        Self::new(Vec::new(), "<memory>")
    }

    pub fn contents(&self) -> &str {
        std::str::from_utf8(&self.inner).unwrap_or_default()
    }
}

impl<W: Write> BeamFileWriter<W> {
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for BeamFileWriter<W> {
    fn write_record(&mut self, record: &ParticleRecord) -> AppResult<()> {
        self.inner
            .write_all(format_record(record).as_bytes())
            .map_err(|err| AppError::sink(&self.path, err))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> AppResult<()> {
        self.inner.flush().map_err(|err| AppError::sink(&self.path, err))
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}
