pub mod bundle_writer;
pub mod record;
pub mod report;

pub use bundle_writer::{BundleTotals, BundleWriter};
pub use record::{read_source, render_record, FileBody, SourceLines};
pub use report::{ExportProgress, ExportReport};

use crate::config::WalkConfig;
use crate::error::Result;
use crate::scanner::{SourceFile, SourceScanner};
use chrono::Utc;
use std::path::Path;

/// Walks a tree and writes one record per matching file into a single bundle.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    walk: WalkConfig,
}

impl Exporter {
    pub fn new(walk: WalkConfig) -> Self {
        Self { walk }
    }

    /// Runs a full export.
    ///
    /// Only the creation of `output` and writes to it can fail; a file that
    /// cannot be read becomes a placeholder record and the walk continues.
    pub fn run(
        &self,
        root: &Path,
        output: &Path,
        suffix: &str,
        progress_callback: Option<&dyn Fn(&ExportProgress)>,
    ) -> Result<ExportReport> {
        let scanner = SourceScanner::new(suffix, &self.walk)?;
        let mut writer = BundleWriter::create(output)?;
        let scanner = scanner.skipping(writer.path());

        let mut progress = ExportProgress::new();
        let mut scan_errors = Vec::new();

        for source in scanner.scan_reporting(root, |err| scan_errors.push(err)) {
            let body = read_source(&source.source_path);
            let bytes = writer.write_record(&source.relative_path, &body)?;
            progress.update_record(source.relative_path, body.line_count(), bytes);

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        let totals = writer.finish()?;

        Ok(ExportReport {
            root: root.to_path_buf(),
            output: output.to_path_buf(),
            extension: suffix.to_string(),
            records_written: totals.records,
            lines_written: progress.lines_written,
            bytes_written: totals.bytes,
            duration: progress.elapsed(),
            completed_at: Utc::now(),
            scan_errors,
        })
    }

    /// Lists the files a run would bundle, without writing anything.
    pub fn plan(&self, root: &Path, output: &Path, suffix: &str) -> Result<Vec<SourceFile>> {
        let scanner = SourceScanner::new(suffix, &self.walk)?.skipping(output);
        Ok(scanner.scan(root).collect())
    }
}

/// Exports every file under `root` whose name ends with `suffix` into
/// `output`, using default walk settings.
pub fn export<P, Q>(root: P, output: Q, suffix: &str) -> Result<ExportReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Exporter::default().run(root.as_ref(), output.as_ref(), suffix, None)
}
