use crate::error::{BundleError, UserFriendlyError};
use crate::exporter::report::format_bytes;
use crate::exporter::{ExportProgress, ExportReport};
use crate::scanner::SourceFile;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Success,
    Error,
    Suggestion,
    Warning,
    Operation,
    Info,
    Debug,
}

impl Level {
    /// `None` means the message survives `--quiet`.
    fn min_verbosity(self) -> Option<u8> {
        match self {
            Level::Success | Level::Error | Level::Suggestion => None,
            Level::Warning | Level::Operation | Level::Info => Some(1),
            Level::Debug => Some(2),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }

    fn name(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Suggestion => "suggestion",
            Level::Warning => "warning",
            Level::Operation => "operation_start",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    fn symbol(self) -> Emoji<'static, 'static> {
        match self {
            Level::Success => Emoji("✅ ", "✓ "),
            Level::Error => Emoji("❌ ", "✗ "),
            Level::Suggestion | Level::Info => Emoji("ℹ️  ", "i "),
            Level::Warning => Emoji("⚠️  ", "! "),
            Level::Operation => Emoji("📦 ", "> "),
            Level::Debug => Emoji("  ", "  "),
        }
    }

    fn paint(self, message: &str) -> String {
        let styled = style(message);
        let painted = match self {
            Level::Success => styled.green().bold(),
            Level::Error => styled.red().bold(),
            Level::Warning => styled.yellow().bold(),
            Level::Operation => styled.bold(),
            Level::Suggestion | Level::Info => styled.cyan(),
            Level::Debug => styled.dim(),
        };
        painted.to_string()
    }
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    pub fn start_operation(&self, operation: &str) {
        self.emit(Level::Operation, operation);
    }

    pub fn print_user_friendly_error(&self, error: &BundleError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Suggestion, &format!("Suggestion: {}", suggestion));
        }
    }

    /// Prints the end-of-run output: the confirmation line naming the bundle,
    /// plus the statistics when verbose (or the whole report in JSON mode).
    pub fn print_export_report(&self, report: &ExportReport) {
        if self.mode == OutputMode::Json {
            let json_output =
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json_output);
            return;
        }

        if self.should_show_message(1) {
            self.print_summary(report);
        }
        self.success(&format!("Export complete: {}", report.output.display()));
    }

    /// Dry-run listing of the records a run would produce.
    pub fn print_plan(&self, files: &[SourceFile]) {
        if self.mode == OutputMode::Json {
            let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
            self.print_json_object(&serde_json::json!({
                "type": "plan",
                "files": paths,
                "count": files.len()
            }));
            return;
        }

        for file in files {
            println!("  {}", file.relative_path);
        }
        if !self.quiet {
            println!("{} file(s) would be exported", files.len());
        }
    }

    /// A titled rule, or a bare one when `title` is empty. Nothing in JSON mode.
    pub fn print_rule(&self, title: &str) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        let line = if title.is_empty() {
            "-".repeat(60)
        } else {
            format!("--- {} ", title)
        };

        if self.use_colors {
            println!("{}", style(line).bold().cyan());
        } else {
            println!("{}", line);
        }
    }

    /// Per-record trace line, shown at `-vv`.
    pub fn print_record_progress(&self, progress: &ExportProgress) {
        if let Some(ref current) = progress.current_file {
            self.debug(&format!("[{}] {}", progress.records_written, current));
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, level: Level, message: &str) {
        if let Some(min) = level.min_verbosity() {
            if !self.should_show_message(min) {
                return;
            }
        }

        let line = match self.mode {
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "message",
                    "level": level.name(),
                    "message": message,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
                return;
            }
            OutputMode::Plain => format!("{}: {}", level.name().to_uppercase(), message),
            OutputMode::Human if self.use_colors => {
                format!("{}{}", level.symbol(), level.paint(message))
            }
            OutputMode::Human => format!("{}{}", level.symbol().1, message),
        };

        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_summary(&self, report: &ExportReport) {
        let rows = [
            ("Records written", report.records_written.to_string()),
            ("Lines written", report.lines_written.to_string()),
            ("Bundle size", format_bytes(report.bytes_written)),
            ("Time taken", format_duration(report.duration)),
        ];

        self.print_rule("");
        for (label, value) in rows {
            let value = if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            };
            println!("  {:<16} {}", format!("{}:", label), value);
        }
        self.print_rule("");
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
