use crate::error::{BundleError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WalkConfig {
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./"),
            output: PathBuf::from("output.lua"),
            extension: ".lua".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BundleError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BundleError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| BundleError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["nixbundle.toml", ".nixbundle.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref root) = cli_args.root {
            self.export.root = root.clone();
        }

        if let Some(ref output) = cli_args.output {
            self.export.output = output.clone();
        }

        if let Some(ref extension) = cli_args.extension {
            self.export.extension = extension.clone();
        }

        if let Some(ref exclude) = cli_args.exclude_dirs {
            self.walk.exclude_dirs.extend(exclude.iter().cloned());
        }

        if let Some(ref patterns) = cli_args.exclude_patterns {
            self.walk.exclude_patterns.extend(patterns.iter().cloned());
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.walk.max_depth = Some(max_depth);
        }

        if cli_args.follow_links {
            self.walk.follow_links = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| BundleError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| BundleError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.extension.is_empty() {
            return Err(BundleError::Config {
                message: "The file extension filter must not be empty".to_string(),
            });
        }

        if self.export.output.as_os_str().is_empty() {
            return Err(BundleError::Config {
                message: "An output file path must be specified".to_string(),
            });
        }

        if self.walk.max_depth == Some(0) {
            return Err(BundleError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for pattern in &self.walk.exclude_patterns {
            Regex::new(pattern).map_err(|source| BundleError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub extension: Option<String>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_exclude_dirs(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude_dirs = exclude;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Option<Vec<String>>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}
