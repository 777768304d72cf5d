use crate::error::{BundleError, Result};
use crate::exporter::record::{render_record, FileBody};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Exclusive owner of the output stream for one run.
///
/// The file is created (or truncated) in [`BundleWriter::create`] and closed
/// when the writer is dropped; [`BundleWriter::finish`] additionally surfaces
/// flush errors.
pub struct BundleWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
    bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleTotals {
    pub records: usize,
    pub bytes: u64,
}

impl BundleWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BundleError::OutputCreate {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(64 * 1024, file), // 64KB buffer
            records: 0,
            bytes: 0,
        })
    }

    /// Appends one record, returning the number of bytes written.
    pub fn write_record(&mut self, relative_path: &str, body: &FileBody) -> Result<u64> {
        let record = render_record(relative_path, body);
        self.writer.write_all(record.as_bytes())?;

        let written = record.len() as u64;
        self.records += 1;
        self.bytes += written;
        Ok(written)
    }

    pub fn finish(mut self) -> Result<BundleTotals> {
        self.writer.flush()?;
        Ok(BundleTotals {
            records: self.records,
            bytes: self.bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
