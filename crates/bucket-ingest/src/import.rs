//! Import of integer arrays from text files.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IngestError, Result};

/// Files must carry this suffix before they are read.
pub const IMPORT_EXTENSION: &str = ".txt";

/// Leading integer of a trimmed line: optional sign, then digits.
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+").unwrap_or_else(|e| panic!("invalid leading integer pattern: {e}"))
});

pub(crate) fn parse_leading_int(line: &str) -> Option<i64> {
    LEADING_INTEGER
        .find(line.trim())
        .and_then(|found| found.as_str().parse().ok())
}

/// Parse file content, one integer per line.
///
/// Lines without a leading integer are dropped rather than coerced, so the
/// result may be shorter than the line count.
pub fn parse_imported_lines(content: &str) -> Vec<i64> {
    content.split('\n').filter_map(parse_leading_int).collect()
}

fn check_extension(name: &str) -> Result<()> {
    if name.ends_with(IMPORT_EXTENSION) {
        Ok(())
    } else {
        Err(IngestError::UnsupportedFormat {
            name: name.to_string(),
        })
    }
}

/// Import already-loaded content named `name`.
///
/// The name is checked before the content is looked at.
pub fn import_text(name: &str, content: &str) -> Result<Vec<i64>> {
    check_extension(name)?;
    let values = parse_imported_lines(content);
    if values.is_empty() {
        return Err(IngestError::NoValidData {
            name: name.to_string(),
        });
    }
    tracing::debug!(file = name, elements = values.len(), "imported array");
    Ok(values)
}

/// Read and import a file from disk.
pub fn import_file(path: &Path) -> Result<Vec<i64>> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    check_extension(&name)?;

    let content = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    import_text(&name, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lines_are_dropped() {
        assert_eq!(parse_imported_lines("10\nabc\n-5\n"), vec![10, -5]);
    }

    #[test]
    fn test_lines_are_trimmed_and_prefix_parsed() {
        assert_eq!(
            parse_imported_lines("  7 \r\n12abc\n3.7\n+4\n--1"),
            vec![7, 12, 3, 4]
        );
    }

    #[test]
    fn test_extension_gate_runs_before_parse() {
        let err = import_text("numbers.csv", "1\n2\n").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_no_valid_lines() {
        let err = import_text("numbers.txt", "a\nb\n\n").unwrap_err();
        assert!(matches!(err, IngestError::NoValidData { .. }));
    }
}
