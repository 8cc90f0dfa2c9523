//! Error types for ZIP extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
///
/// Only [`ExtractError::InvalidInput`] and [`ExtractError::OutputDirectory`]
/// ever escape an engine call. Every other variant is caught at the entry or
/// archive boundary and turned into a log line.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input is neither a `.zip` file nor a directory.
    #[error("Invalid input path: {0}. Must be a .zip file or a directory containing .zip files")]
    InvalidInput(PathBuf),

    /// The output root could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An archive could not be opened, or one of its entries could not be read.
    #[error("{0}")]
    ArchiveRead(#[from] zip::result::ZipError),

    /// A single entry could not be written to disk.
    #[error("{source}")]
    EntryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry name cannot be mapped safely under the output root.
    #[error("{0}")]
    UnsafePath(#[from] SecurityError),

    /// The blocking wrapper could not start its runtime. Never produced by
    /// the engine itself.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether this error fails the whole call instead of becoming a log line.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractError::InvalidInput(_) | ExtractError::OutputDirectory { .. }
        )
    }
}

/// Entry names that would escape the output root.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Path traversal attempt detected (e.g., "../../../etc/passwd").
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// Absolute path not allowed in archive entries.
    #[error("Absolute path not allowed: {0}")]
    AbsolutePath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ExtractError::InvalidInput(PathBuf::from("x")).is_fatal());
        assert!(ExtractError::OutputDirectory {
            path: PathBuf::from("out"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .is_fatal());

        let runtime_err = ExtractError::from(std::io::Error::from(std::io::ErrorKind::Other));
        assert!(!runtime_err.is_fatal());

        let archive_err = ExtractError::from(zip::result::ZipError::FileNotFound);
        assert!(!archive_err.is_fatal());

        let entry_err = ExtractError::EntryWrite {
            path: PathBuf::from("out/x.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!entry_err.is_fatal());
    }

    #[test]
    fn test_invalid_input_message_names_path() {
        let err = ExtractError::InvalidInput(PathBuf::from("/tmp/notes.txt"));
        assert!(err.to_string().contains("/tmp/notes.txt"));
    }
}
