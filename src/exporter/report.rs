use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub records_written: usize,
    pub lines_written: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl ExportProgress {
    pub fn new() -> Self {
        Self {
            records_written: 0,
            lines_written: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_record(&mut self, relative_path: String, lines: usize, bytes: u64) {
        self.records_written += 1;
        self.lines_written += lines;
        self.bytes_written += bytes;
        self.current_file = Some(relative_path);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ExportProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed run.
///
/// Unreadable files are not counted here; they show up only as placeholder
/// comments inside the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub root: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub records_written: usize,
    pub lines_written: usize,
    pub bytes_written: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    /// Directories the walk could not enter.
    #[serde(default)]
    pub scan_errors: Vec<String>,
}

impl ExportReport {
    pub fn display_summary(&self) -> String {
        format!(
            "Export Results:\n  Records: {}\n  Lines: {}\n  Size: {}\n",
            self.records_written,
            self.lines_written,
            format_bytes(self.bytes_written)
        )
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
