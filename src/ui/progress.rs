use crate::exporter::ExportProgress;
use crate::ui::output::format_duration;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for the export walk. The number of matches is unknown until the
/// walk ends, so there is no bar with a length.
pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
        );
        pb.set_message(message.to_string());
        pb
    }
}

pub fn update_export_progress(pb: &ProgressBar, progress: &ExportProgress) {
    pb.set_position(progress.records_written as u64);

    match progress.current_file {
        Some(ref current_file) => pb.set_message(current_file.clone()),
        None => pb.set_message("Scanning..."),
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}
