//! The per-file record format.
//!
//! ```text
//! "lua/core.lua".text = ''
//! 	<line 1>
//! 	<line 2>
//! '';
//!
//! ```
//!
//! Content is written verbatim after a single tab; nothing is escaped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const HEADER_SUFFIX: &str = "\".text = '' \n";
const FOOTER: &str = "'';\n\n";
const INDENT: char = '\t';
const PLACEHOLDER_MARKER: &str = "-- ";

/// What a matched file contributes to its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    /// Lines with their original terminators.
    Content(Vec<String>),
    /// Description of why the file could not be read.
    Unreadable(String),
}

impl FileBody {
    pub fn line_count(&self) -> usize {
        match self {
            FileBody::Content(lines) => lines.len(),
            FileBody::Unreadable(_) => 0,
        }
    }
}

/// Single-pass iterator over the lines of a reader, terminators included.
///
/// Stops after the first error.
pub struct SourceLines<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(line)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads a matched file completely before any of it is written, so a
/// decoding failure halfway through leaves no partial content behind.
pub fn read_source(path: &Path) -> FileBody {
    let lines = File::open(path)
        .and_then(|file| SourceLines::new(BufReader::new(file)).collect::<io::Result<Vec<_>>>());

    match lines {
        Ok(lines) => FileBody::Content(lines),
        Err(e) => FileBody::Unreadable(format!("Error reading file: {}", e)),
    }
}

pub fn render_record(relative_path: &str, body: &FileBody) -> String {
    let mut record = String::with_capacity(relative_path.len() + 64);

    record.push('"');
    record.push_str(relative_path);
    record.push_str(HEADER_SUFFIX);

    match body {
        FileBody::Content(lines) => {
            for line in lines {
                record.push(INDENT);
                record.push_str(line);
            }
        }
        FileBody::Unreadable(description) => {
            record.push(INDENT);
            record.push_str(PLACEHOLDER_MARKER);
            record.push_str(description);
            record.push('\n');
        }
    }

    record.push_str(FOOTER);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lines(input: &[u8]) -> Vec<io::Result<String>> {
        SourceLines::new(input).collect()
    }

    #[test]
    fn test_source_lines_keep_terminators() {
        let collected: Vec<String> = lines(b"a\r\nb\nc")
            .into_iter()
            .map(|l| l.unwrap())
            .collect();

        assert_eq!(collected, vec!["a\r\n", "b\n", "c"]);
    }

    #[test]
    fn test_source_lines_empty_input() {
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn test_source_lines_stop_after_error() {
        let collected = lines(b"ok\n\xff\xfe\nnever\n");

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].as_ref().unwrap(), "ok\n");
        assert!(collected[1].is_err());
    }

    #[test]
    fn test_render_content_record() {
        let body = FileBody::Content(vec!["print(1)\n".to_string()]);

        assert_eq!(
            render_record("a.ext", &body),
            "\"a.ext\".text = '' \n\tprint(1)\n'';\n\n"
        );
    }

    #[test]
    fn test_render_unterminated_last_line() {
        let body = FileBody::Content(vec!["x = 1\n".to_string(), "y = 2".to_string()]);

        assert_eq!(
            render_record("lua/vars.lua", &body),
            "\"lua/vars.lua\".text = '' \n\tx = 1\n\ty = 2'';\n\n"
        );
    }

    #[test]
    fn test_render_preserves_crlf() {
        let body = FileBody::Content(vec!["a\r\n".to_string()]);

        assert_eq!(render_record("w.lua", &body), "\"w.lua\".text = '' \n\ta\r\n'';\n\n");
    }

    #[test]
    fn test_render_empty_file() {
        let body = FileBody::Content(Vec::new());

        assert_eq!(render_record("empty.lua", &body), "\"empty.lua\".text = '' \n'';\n\n");
    }

    #[test]
    fn test_render_placeholder() {
        let body = FileBody::Unreadable("Error reading file: boom".to_string());

        assert_eq!(
            render_record("bad.lua", &body),
            "\"bad.lua\".text = '' \n\t-- Error reading file: boom\n'';\n\n"
        );
    }

    #[test]
    fn test_read_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("init.lua");
        fs::write(&path, "local a = 1\nreturn a\n").unwrap();

        let body = read_source(&path);
        assert_eq!(
            body,
            FileBody::Content(vec!["local a = 1\n".to_string(), "return a\n".to_string()])
        );
        assert_eq!(body.line_count(), 2);
    }

    #[test]
    fn test_read_source_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.lua");
        fs::write(&path, b"fine\n\xc3\x28\n").unwrap();

        match read_source(&path) {
            FileBody::Unreadable(description) => {
                assert!(description.starts_with("Error reading file: "));
            }
            other => panic!("expected unreadable body, got {:?}", other),
        }
    }

    #[test]
    fn test_read_source_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let body = read_source(&temp_dir.path().join("gone.lua"));

        assert!(matches!(body, FileBody::Unreadable(_)));
        assert_eq!(body.line_count(), 0);
    }
}
