//! Class index: integer label id -> human-readable class name.
//!
//! Loaded once from a UTF-8 text resource with one `"<index>: <name>"`
//! entry per line.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Mapping from model output id to class name
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    names: BTreeMap<usize, String>,
}

impl ClassIndex {
    /// Load the index from a text file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ResourceNotFound(format!("class index {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Parse index text. Blank lines are skipped; indices must be unique.
    pub fn parse(text: &str) -> Result<Self> {
        let mut names = BTreeMap::new();

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (idx, name) = line.split_once(": ").ok_or_else(|| {
                Error::Format(format!(
                    "class index line {}: expected \"<index>: <name>\", got {:?}",
                    lineno + 1,
                    line
                ))
            })?;

            let idx: usize = idx.trim().parse().map_err(|_| {
                Error::Format(format!(
                    "class index line {}: {:?} is not a non-negative integer",
                    lineno + 1,
                    idx
                ))
            })?;

            if names.insert(idx, name.to_string()).is_some() {
                return Err(Error::Format(format!(
                    "class index line {}: duplicate index {}",
                    lineno + 1,
                    idx
                )));
            }
        }

        Ok(Self { names })
    }

    /// Resolve a class id to its name
    pub fn name(&self, id: usize) -> Result<&str> {
        self.names.get(&id).map(String::as_str).ok_or_else(|| {
            Error::Lookup(format!("class id {} has no entry in the class index", id))
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid() {
        let index = ClassIndex::parse("0: Apple scab\n1: Apple rust\n2: Healthy\n").unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.name(0).unwrap(), "Apple scab");
        assert_eq!(index.name(2).unwrap(), "Healthy");
    }

    #[test]
    fn test_parse_keeps_colons_in_name() {
        // Only the first ": " separates id from name
        let index = ClassIndex::parse("0: Tomato: early blight").unwrap();
        assert_eq!(index.name(0).unwrap(), "Tomato: early blight");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let index = ClassIndex::parse("0: a\n\n1: b\n").unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_parse_missing_colon_is_format_error() {
        let err = ClassIndex::parse("0 Apple scab").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_non_integer_index_is_format_error() {
        let err = ClassIndex::parse("x: Apple scab").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_duplicate_index_is_format_error() {
        let err = ClassIndex::parse("0: a\n0: b\n").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_lookup_missing_id() {
        let index = ClassIndex::parse("0: a\n1: b\n").unwrap();
        let err = index.name(7).unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[test]
    fn test_load_missing_file_is_resource_not_found() {
        let err = ClassIndex::load(Path::new("/nonexistent/class_names.txt")).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn test_load_unreadable_path_is_resource_not_found() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let err = ClassIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "0: Corn rust").unwrap();
        writeln!(f, "1: Corn blight").unwrap();
        f.flush().unwrap();

        let index = ClassIndex::load(f.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.name(1).unwrap(), "Corn blight");
    }
}
