pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExportConfig, WalkConfig};
pub use error::{BundleError, Result, UserFriendlyError};

// Core functionality re-exports
pub use exporter::{export, ExportProgress, ExportReport, Exporter, FileBody};
pub use scanner::{FileFilter, SourceFile, SourceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for NixBundle functionality
pub struct NixBundle {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl NixBundle {
    /// Create a new NixBundle instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Record-by-record debug lines would fight with the spinner.
        let progress_manager =
            ProgressManager::new(output_mode == OutputMode::Human && !quiet && verbose < 2);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create NixBundle instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Export every matching file under the configured root into the
    /// configured output file.
    pub fn export(&self) -> Result<ExportReport> {
        let settings = &self.config.export;

        self.output_formatter.start_operation(&format!(
            "Bundling '{}' files from {}",
            settings.extension,
            settings.root.display()
        ));

        let spinner = self.progress_manager.create_spinner("Scanning...");
        let progress_callback = {
            let pb = spinner.clone();
            let formatter = &self.output_formatter;
            move |progress: &ExportProgress| {
                ui::progress::update_export_progress(&pb, progress);
                formatter.print_record_progress(progress);
            }
        };

        let exporter = Exporter::new(self.config.walk.clone());
        let result = exporter.run(
            &settings.root,
            &settings.output,
            &settings.extension,
            Some(&progress_callback),
        );

        match result {
            Ok(report) => {
                ui::progress::finish_progress_with_summary(
                    &spinner,
                    &format!("Wrote {} records", report.records_written),
                    report.duration,
                );
                for note in &report.scan_errors {
                    self.output_formatter.debug(note);
                }
                self.output_formatter.debug(&report.display_summary());
                Ok(report)
            }
            Err(e) => {
                spinner.abandon();
                Err(e)
            }
        }
    }

    /// List the files an export would include, without writing anything
    pub fn plan(&self) -> Result<Vec<SourceFile>> {
        let settings = &self.config.export;
        Exporter::new(self.config.walk.clone()).plan(
            &settings.root,
            &settings.output,
            &settings.extension,
        )
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &BundleError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
