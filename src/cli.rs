use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nixbundle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bundle source files into a single Nix attribute set")]
#[command(
    long_about = "NixBundle walks a directory tree, picks every file whose name ends with \
                  the given extension, and writes them all into one file as \
                  \"path\".text = '' ... ''; records, ready for home-manager's xdg.configFile."
)]
#[command(after_help = "EXAMPLES:\n  \
    nixbundle\n  \
    nixbundle ~/.config/nvim --output nvim.nix\n  \
    nixbundle . --extension .vim --exclude .git,pack\n  \
    nixbundle --config my-config.toml --dry-run")]
pub struct Cli {
    /// Directory to search (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// File to write the bundle to (truncated if it exists)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name suffix to export
    #[arg(short, long, help = "File name suffix to export (e.g., .lua, .vim)")]
    pub extension: Option<String>,

    /// Directory names to skip (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Regex matched against root-relative paths to skip (repeatable)
    #[arg(long = "exclude-pattern")]
    pub exclude_pattern: Option<Vec<String>>,

    /// Maximum directory depth to descend
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow symbolic links to directories
    #[arg(long)]
    pub follow_links: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the files that would be exported without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_root(self.root.clone())
            .with_output(self.output.clone())
            .with_extension(self.extension.clone())
            .with_exclude_dirs(self.exclude.clone())
            .with_exclude_patterns(self.exclude_pattern.clone())
            .with_max_depth(self.max_depth)
            .with_follow_links(self.follow_links)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
