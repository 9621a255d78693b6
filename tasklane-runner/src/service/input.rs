//! Input service
//!
//! Supplies the bytes of local input files. A missing file is reported as an
//! input error so the job fails before anything is sent to the backend.

use std::path::Path;

use crate::error::{JobError, Result};

/// Service trait for reading local input files
pub trait InputReader: Send + Sync {
    /// Reads a whole file
    ///
    /// # Arguments
    /// * `path` - Path to the input file
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Filesystem implementation of InputReader
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInputReader;

impl FsInputReader {
    pub fn new() -> Self {
        Self
    }
}

impl InputReader for FsInputReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(JobError::input(format!(
                "File not found: {}",
                path.display()
            )));
        }

        std::fs::read(path)
            .map_err(|e| JobError::input(format!("Failed to read {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        std::fs::write(&path, b"PNG").unwrap();

        let bytes = FsInputReader::new().read(&path).unwrap();
        assert_eq!(bytes, b"PNG");
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsInputReader::new()
            .read(&dir.path().join("missing.png"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_directory_is_not_an_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsInputReader::new().read(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
