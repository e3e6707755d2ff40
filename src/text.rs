use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{PaperError, Result};

/// Bring any text into the shape the session expects: `\n` line endings,
/// tabs as spaces, no trailing whitespace.
///
/// Trailing whitespace is dropped so a file's final newline does not have to
/// be typed.
pub fn normalize(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "    ")
        .trim_end()
        .to_string()
}

/// Read a practice text from a file. An empty file is an error, since the
/// caller asked for its content explicitly.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| PaperError::ReadText {
        path: path.to_path_buf(),
        source,
    })?;
    let text = normalize(&raw);
    if text.is_empty() {
        return Err(PaperError::EmptyText(path.to_path_buf()));
    }
    info!(path = %path.display(), chars = text.chars().count(), "loaded text");
    Ok(text)
}

/// Pick the initial text: an explicit prompt wins over a file, and with
/// neither the session starts out waiting for a paste.
pub fn initial_text(prompt: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (prompt, file) {
        (Some(prompt), _) => Ok(normalize(prompt)),
        (None, Some(path)) => from_file(path),
        (None, None) => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\n"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_tabs_and_trailing_whitespace() {
        assert_eq!(normalize("fn main() {\n\tx\n}\n\n  "), "fn main() {\n    x\n}");
    }

    #[test]
    fn test_normalize_keeps_leading_indent() {
        assert_eq!(normalize("  a"), "  a");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "hello\r\nworld\n").unwrap();

        let text = from_file(file.path()).unwrap();

        assert_eq!(text, "hello\nworld");
    }

    #[test]
    fn test_from_empty_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, " \n\n").unwrap();

        assert_matches!(from_file(file.path()), Err(PaperError::EmptyText(_)));
    }

    #[test]
    fn test_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        assert_matches!(from_file(&missing), Err(PaperError::ReadText { .. }));
    }

    #[test]
    fn test_initial_text_prefers_prompt() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();

        let text = initial_text(Some("from prompt"), Some(file.path())).unwrap();

        assert_eq!(text, "from prompt");
    }

    #[test]
    fn test_initial_text_falls_back_to_file_then_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();

        assert_eq!(initial_text(None, Some(file.path())).unwrap(), "from file");
        assert_eq!(initial_text(None, None).unwrap(), "");
    }
}
