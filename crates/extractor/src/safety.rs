//! Mapping of archive entry names onto the output root.
//!
//! Entry names are untrusted. Preserved names are normalized and rejected if
//! they would land outside the output root (zip-slip); flattened names keep
//! only the final segment.

use crate::error::SecurityError;
use std::path::{Component, Path, PathBuf};

/// Validates and normalizes an archive entry path.
///
/// - Rejects absolute paths
/// - Rejects paths containing ".." components
/// - Drops "." components and redundant separators
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use extractor::safety::validate_entry_path;
///
/// let safe_path = validate_entry_path(Path::new("dir/./file.txt")).unwrap();
/// assert_eq!(safe_path, Path::new("dir/file.txt"));
///
/// assert!(validate_entry_path(Path::new("../../etc/passwd")).is_err());
/// assert!(validate_entry_path(Path::new("/etc/passwd")).is_err());
/// ```
pub fn validate_entry_path(path: &Path) -> Result<PathBuf, SecurityError> {
    if path.is_absolute() {
        return Err(SecurityError::AbsolutePath(path.display().to_string()));
    }

    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => continue,
            Component::ParentDir => {
                return Err(SecurityError::PathTraversal(format!(
                    "Path contains '..' component: {}",
                    path.display()
                )));
            }
            // `C:` or `\\server` prefixes, or a root that slipped past is_absolute
            Component::RootDir | Component::Prefix(_) => {
                return Err(SecurityError::AbsolutePath(path.display().to_string()));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(SecurityError::PathTraversal(format!(
            "Path normalizes to empty: {:?}",
            path
        )));
    }

    Ok(normalized)
}

/// Base filename of a ZIP entry name: everything after the last `/`.
///
/// ```
/// use std::path::Path;
/// use extractor::safety::flatten_entry_name;
///
/// assert_eq!(flatten_entry_name("a/b/x.txt").unwrap(), Path::new("x.txt"));
/// assert_eq!(flatten_entry_name("x.txt").unwrap(), Path::new("x.txt"));
/// ```
pub fn flatten_entry_name(entry_name: &str) -> Result<PathBuf, SecurityError> {
    let base = entry_name.rsplit('/').next().unwrap_or(entry_name);
    validate_entry_path(Path::new(base))
}

/// Relative path (under the output root) an entry is written to.
pub fn relative_target(entry_name: &str, keep_structure: bool) -> Result<PathBuf, SecurityError> {
    if keep_structure {
        validate_entry_path(Path::new(entry_name))
    } else {
        flatten_entry_name(entry_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entry_path_valid() {
        let result = validate_entry_path(Path::new("file.txt"));
        assert_eq!(result.unwrap(), Path::new("file.txt"));

        let result = validate_entry_path(Path::new("dir/subdir/file.txt"));
        assert_eq!(result.unwrap(), Path::new("dir/subdir/file.txt"));

        let result = validate_entry_path(Path::new("./dir/file.txt"));
        assert_eq!(result.unwrap(), Path::new("dir/file.txt"));
    }

    #[test]
    fn test_validate_entry_path_absolute() {
        let result = validate_entry_path(Path::new("/etc/passwd"));
        assert!(matches!(result.unwrap_err(), SecurityError::AbsolutePath(_)));
    }

    #[test]
    fn test_validate_entry_path_traversal() {
        let result = validate_entry_path(Path::new("../etc/passwd"));
        assert!(matches!(result.unwrap_err(), SecurityError::PathTraversal(_)));

        assert!(validate_entry_path(Path::new("dir/../etc/passwd")).is_err());
        assert!(validate_entry_path(Path::new("dir/..")).is_err());
        assert!(validate_entry_path(Path::new("./../../etc/passwd")).is_err());
    }

    #[test]
    fn test_validate_entry_path_edge_cases() {
        assert!(validate_entry_path(Path::new("dir//file.txt")).is_ok());

        let result = validate_entry_path(Path::new("./././file.txt"));
        assert_eq!(result.unwrap(), Path::new("file.txt"));

        assert!(validate_entry_path(Path::new(".")).is_err());
        assert!(validate_entry_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_entry_path_unicode() {
        let result = validate_entry_path(Path::new("日本語/ファイル.txt"));
        assert_eq!(result.unwrap(), Path::new("日本語/ファイル.txt"));

        assert!(validate_entry_path(Path::new("中文/../../etc/passwd")).is_err());
    }

    #[test]
    fn test_flatten_discards_directories() {
        assert_eq!(flatten_entry_name("a/b/x.txt").unwrap(), Path::new("x.txt"));
        assert_eq!(flatten_entry_name("c/x.txt").unwrap(), Path::new("x.txt"));
        // traversal segments vanish along with the rest of the directory part
        assert_eq!(flatten_entry_name("../../x.txt").unwrap(), Path::new("x.txt"));
    }

    #[test]
    fn test_flatten_rejects_nameless_entries() {
        assert!(flatten_entry_name("a/..").is_err());
        assert!(flatten_entry_name("a/.").is_err());
    }

    #[test]
    fn test_relative_target_modes() {
        assert_eq!(relative_target("a/b/x.txt", false).unwrap(), Path::new("x.txt"));
        assert_eq!(relative_target("a/b/x.txt", true).unwrap(), Path::new("a/b/x.txt"));
        assert!(relative_target("../x.txt", true).is_err());
    }
}
