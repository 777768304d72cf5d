use crate::config::WalkConfig;
use crate::error::{BundleError, Result};
use regex::Regex;

/// Decides which walk entries become records.
///
/// The suffix test is a plain, case-sensitive `ends_with` on the file name,
/// so a filter of `.lua` also matches a file literally named `.lua`.
/// Exclude patterns are matched against the root-relative, `/`-joined path.
pub struct FileFilter {
    suffix: String,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new<S: Into<String>>(suffix: S, config: &WalkConfig) -> Result<Self> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| BundleError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            suffix: suffix.into(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        })
    }

    pub fn matches_suffix(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }

    pub fn should_traverse_directory(&self, dir_name: &str, relative_path: &str) -> bool {
        if self.exclude_dirs.iter().any(|exclude| exclude == dir_name) {
            return false;
        }

        !self.matches_any_pattern(relative_path)
    }

    pub fn is_excluded_file(&self, relative_path: &str) -> bool {
        self.matches_any_pattern(relative_path)
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> WalkConfig {
        WalkConfig {
            exclude_dirs: vec![".git".to_string(), "node_modules".to_string()],
            exclude_patterns: vec![r"^plugin/packer_compiled".to_string(), r"\.bak$".to_string()],
            max_depth: None,
            follow_links: false,
        }
    }

    #[test]
    fn test_suffix_matching() {
        let filter = FileFilter::new(".lua", &WalkConfig::default()).unwrap();

        assert!(filter.matches_suffix("init.lua"));
        assert!(filter.matches_suffix("keymaps.lua"));
        assert!(filter.matches_suffix(".lua"));

        assert!(!filter.matches_suffix("init.vim"));
        assert!(!filter.matches_suffix("init.lua.bak"));
        assert!(!filter.matches_suffix("lua"));
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        let filter = FileFilter::new(".lua", &WalkConfig::default()).unwrap();

        assert!(!filter.matches_suffix("INIT.LUA"));
        assert!(!filter.matches_suffix("init.Lua"));
    }

    #[test]
    fn test_suffix_without_dot() {
        let filter = FileFilter::new("rc", &WalkConfig::default()).unwrap();

        assert!(filter.matches_suffix("vimrc"));
        assert!(filter.matches_suffix(".bashrc"));
        assert!(!filter.matches_suffix("rc.lua"));
    }

    #[test]
    fn test_directory_traversal_rules() {
        let filter = FileFilter::new(".lua", &create_test_config()).unwrap();

        assert!(filter.should_traverse_directory("lua", "lua"));
        assert!(filter.should_traverse_directory("plugins", "lua/plugins"));

        assert!(!filter.should_traverse_directory(".git", ".git"));
        assert!(!filter.should_traverse_directory("node_modules", "a/node_modules"));

        // exclude_dirs compares whole names only
        assert!(filter.should_traverse_directory("git", "git"));
    }

    #[test]
    fn test_default_config_excludes_nothing() {
        let filter = FileFilter::new(".lua", &WalkConfig::default()).unwrap();

        assert!(filter.should_traverse_directory(".git", ".git"));
        assert!(filter.should_traverse_directory("target", "target"));
        assert!(!filter.is_excluded_file("lua/plugins/init.lua"));
    }

    #[test]
    fn test_pattern_matching() {
        let filter = FileFilter::new(".lua", &create_test_config()).unwrap();

        assert!(filter.is_excluded_file("plugin/packer_compiled.lua"));
        assert!(filter.matches_any_pattern("init.lua.bak"));
        assert!(!filter.is_excluded_file("lua/plugin/packer_compiled.lua"));
        assert!(!filter.matches_any_pattern("init.lua"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = WalkConfig {
            exclude_patterns: vec!["(unclosed".to_string()],
            ..WalkConfig::default()
        };

        let result = FileFilter::new(".lua", &config);
        assert!(matches!(result, Err(BundleError::InvalidPattern { .. })));
    }
}
