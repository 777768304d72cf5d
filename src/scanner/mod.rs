pub mod file_filter;
pub mod source_scanner;

pub use file_filter::FileFilter;
pub use source_scanner::{relative_path, SourceFile, SourceScanner};
