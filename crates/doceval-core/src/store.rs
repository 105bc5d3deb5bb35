//! Flat-file document store.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::LoopError;

/// Read a document, reporting a missing file as [`LoopError::NotFound`]
pub fn read_document(path: &Path) -> Result<String, LoopError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoopError::NotFound(path.to_path_buf()),
        _ => LoopError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Write a document, creating parent directories and overwriting any existing file
pub fn write_document(path: &Path, content: &str) -> Result<(), LoopError> {
    let io_err = |source| LoopError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    fs::write(path, content).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.md");

        let err = read_document(&missing).unwrap_err();
        assert!(matches!(err, LoopError::NotFound(ref p) if p == &missing));
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("doc.md");

        write_document(&path, "first").unwrap();
        write_document(&path, "second").unwrap();

        assert_eq!(read_document(&path).unwrap(), "second");
    }
}
