use crate::config::WalkConfig;
use crate::error::Result;
use crate::scanner::file_filter::FileFilter;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub source_path: PathBuf,
    pub relative_path: String,
}

impl SourceFile {
    pub fn new(source_path: PathBuf, root: &Path) -> Self {
        let relative_path = relative_path(&source_path, root);

        Self {
            source_path,
            relative_path,
        }
    }
}

pub struct SourceScanner {
    filter: FileFilter,
    max_depth: Option<usize>,
    follow_links: bool,
    skip_path: Option<PathBuf>,
}

impl SourceScanner {
    pub fn new(suffix: &str, config: &WalkConfig) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::new(suffix, config)?,
            max_depth: config.max_depth,
            follow_links: config.follow_links,
            skip_path: None,
        })
    }

    /// Never yield `path`, even when it sits under the root and matches.
    /// Used to keep the bundle from reading itself.
    pub fn skipping<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.skip_path = fs::canonicalize(path.as_ref()).ok();
        self
    }

    /// Lazily walks `root`, yielding matching files in discovery order.
    ///
    /// Directory entries are sorted by file name, so two walks of an
    /// unchanged tree yield the same sequence. A missing or unreadable root
    /// yields nothing; unreadable subdirectories are skipped.
    pub fn scan<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = SourceFile> + 'a {
        self.scan_reporting(root, |_| {})
    }

    /// Same walk as [`scan`](Self::scan), handing a description of every
    /// entry the walk could not read to `on_error`.
    pub fn scan_reporting<'a, F>(
        &'a self,
        root: &'a Path,
        mut on_error: F,
    ) -> impl Iterator<Item = SourceFile> + 'a
    where
        F: FnMut(String) + 'a,
    {
        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        walker
            .into_iter()
            .filter_entry(move |e| self.should_traverse(e, root))
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    on_error(describe_walk_error(&err));
                    None
                }
            })
            .filter_map(move |entry| self.process_entry(&entry, root))
    }

    fn should_traverse(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let dir_name = entry.file_name().to_string_lossy();
        let relative = relative_path(entry.path(), root);
        self.filter.should_traverse_directory(&dir_name, &relative)
    }

    fn process_entry(&self, entry: &DirEntry, root: &Path) -> Option<SourceFile> {
        // The root itself is never a record, even when it is a file.
        if entry.depth() == 0 || !is_candidate(entry) {
            return None;
        }

        if !self
            .filter
            .matches_suffix(&entry.file_name().to_string_lossy())
        {
            return None;
        }

        if self.is_skipped(entry.path()) {
            return None;
        }

        let source = SourceFile::new(entry.path().to_path_buf(), root);
        if self.filter.is_excluded_file(&source.relative_path) {
            return None;
        }

        Some(source)
    }

    fn is_skipped(&self, path: &Path) -> bool {
        let Some(ref skip) = self.skip_path else {
            return false;
        };

        if path.file_name() != skip.file_name() {
            return false;
        }

        fs::canonicalize(path).is_ok_and(|p| &p == skip)
    }
}

fn describe_walk_error(err: &walkdir::Error) -> String {
    let denied = err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);

    if denied {
        format!("Permission denied: {}", err)
    } else {
        format!("Scan error: {}", err)
    }
}

// Regular files, plus symlinks that do not lead to a directory. Dangling
// links stay in so that they surface as unreadable records.
fn is_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }

    file_type.is_symlink() && !entry.path().is_dir()
}

/// Root-relative path with components joined by `/` on every platform.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scanner(suffix: &str) -> SourceScanner {
        SourceScanner::new(suffix, &WalkConfig::default()).unwrap()
    }

    fn relative_paths(scanner: &SourceScanner, root: &Path) -> Vec<String> {
        scanner.scan(root).map(|f| f.relative_path).collect()
    }

    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("lua/plugins")).unwrap();
        fs::write(root.join("init.lua"), "require('core')\n").unwrap();
        fs::write(root.join("README.md"), "# config\n").unwrap();
        fs::write(root.join("lua/core.lua"), "vim.o.number = true\n").unwrap();
        fs::write(root.join("lua/plugins/telescope.lua"), "return {}\n").unwrap();
        fs::write(root.join("lua/plugins/notes.txt"), "todo\n").unwrap();
    }

    #[test]
    fn test_finds_matching_files_only() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let found = relative_paths(&scanner(".lua"), temp_dir.path());

        assert_eq!(
            found,
            vec!["init.lua", "lua/core.lua", "lua/plugins/telescope.lua"]
        );
    }

    #[test]
    fn test_scan_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let scanner = scanner(".lua");

        let first = relative_paths(&scanner, temp_dir.path());
        let second = relative_paths(&scanner, temp_dir.path());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        assert!(relative_paths(&scanner(".lua"), &missing).is_empty());
    }

    #[test]
    fn test_walk_errors_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let missing = temp_dir.path().join("does-not-exist");
        let scanner = scanner(".lua");

        let mut errors = Vec::new();
        let found: Vec<_> = scanner
            .scan_reporting(&missing, |err| errors.push(err))
            .collect();
        assert!(found.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Scan error: "));

        let mut errors = Vec::new();
        let found: Vec<_> = scanner
            .scan_reporting(temp_dir.path(), |err| errors.push(err))
            .collect();
        assert_eq!(found.len(), 3);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_file_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("single.lua");
        fs::write(&file, "x = 1\n").unwrap();

        assert!(relative_paths(&scanner(".lua"), &file).is_empty());
    }

    #[test]
    fn test_directories_with_suffix_are_not_records() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("odd.lua")).unwrap();
        fs::write(temp_dir.path().join("odd.lua/inner.lua"), "").unwrap();

        let found = relative_paths(&scanner(".lua"), temp_dir.path());
        assert_eq!(found, vec!["odd.lua/inner.lua"]);
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let config = WalkConfig {
            exclude_dirs: vec!["plugins".to_string()],
            ..WalkConfig::default()
        };
        let scanner = SourceScanner::new(".lua", &config).unwrap();

        let found = relative_paths(&scanner, temp_dir.path());
        assert_eq!(found, vec!["init.lua", "lua/core.lua"]);
    }

    #[test]
    fn test_exclude_patterns_apply_to_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let config = WalkConfig {
            exclude_patterns: vec![r"^lua/core\.lua$".to_string()],
            ..WalkConfig::default()
        };
        let scanner = SourceScanner::new(".lua", &config).unwrap();

        let found = relative_paths(&scanner, temp_dir.path());
        assert_eq!(found, vec!["init.lua", "lua/plugins/telescope.lua"]);
    }

    #[test]
    fn test_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let config = WalkConfig {
            max_depth: Some(1),
            ..WalkConfig::default()
        };
        let scanner = SourceScanner::new(".lua", &config).unwrap();

        assert_eq!(relative_paths(&scanner, temp_dir.path()), vec!["init.lua"]);
    }

    #[test]
    fn test_skipping_output_file() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let output = temp_dir.path().join("output.lua");
        fs::write(&output, "").unwrap();

        let scanner = scanner(".lua").skipping(&output);
        let found = relative_paths(&scanner, temp_dir.path());

        assert!(!found.contains(&"output.lua".to_string()));
        assert_eq!(found.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        let outside = temp_dir.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("linked.lua"), "return 1\n").unwrap();

        symlink(outside.join("linked.lua"), root.join("file_link.lua")).unwrap();
        symlink(&outside, root.join("dir_link.lua")).unwrap();
        symlink(root.join("missing"), root.join("dangling.lua")).unwrap();

        let found = relative_paths(&scanner(".lua"), &root);
        assert_eq!(found, vec!["dangling.lua", "file_link.lua"]);
    }

    #[test]
    fn test_relative_path_normalization() {
        let root = Path::new("./");
        let path = Path::new("./sub/dir/name.ext");
        assert_eq!(relative_path(path, root), "sub/dir/name.ext");

        let root = Path::new("/home/user/.config/nvim");
        let path = Path::new("/home/user/.config/nvim/lua/init.lua");
        assert_eq!(relative_path(path, root), "lua/init.lua");
    }

    #[test]
    fn test_source_file_creation() {
        let source = SourceFile::new(
            PathBuf::from("/cfg/lua/plugins/cmp.lua"),
            Path::new("/cfg"),
        );

        assert_eq!(source.relative_path, "lua/plugins/cmp.lua");
    }
}
