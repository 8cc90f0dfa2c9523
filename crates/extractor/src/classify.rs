//! Input classification and output-root preparation.

use crate::error::ExtractError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Archive file suffix. Matched case-sensitively.
pub const ZIP_EXTENSION: &str = ".zip";

/// What an input path turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A single `.zip` file
    Archive(PathBuf),

    /// A directory and the `.zip` files directly inside it, sorted by name
    Directory { dir: PathBuf, archives: Vec<PathBuf> },
}

/// Classify `input` as a single archive or a directory of archives.
///
/// Directory listings are not recursive. When `prefix` is set, archives whose
/// file name does not start with it are left out of the listing.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidInput`] when the path does not exist, is a
/// file without a `.zip` suffix, is a directory that cannot be listed, or is
/// something other than a file or a directory.
pub fn classify_input(input: &Path, prefix: Option<&str>) -> Result<InputKind, ExtractError> {
    let metadata =
        fs::metadata(input).map_err(|_| ExtractError::InvalidInput(input.to_path_buf()))?;

    if metadata.is_file() && is_zip_name(input) {
        return Ok(InputKind::Archive(input.to_path_buf()));
    }

    if metadata.is_dir() {
        let archives = list_archives(input, prefix)?;
        return Ok(InputKind::Directory {
            dir: input.to_path_buf(),
            archives,
        });
    }

    Err(ExtractError::InvalidInput(input.to_path_buf()))
}

/// `.zip` files directly inside `dir`.
fn list_archives(dir: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>, ExtractError> {
    let mut archives = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to list input directory");
            ExtractError::InvalidInput(dir.to_path_buf())
        })?;

        let path = entry.path();
        // follows symlinks, unlike entry.file_type()
        if !path.is_file() || !is_zip_name(path) {
            continue;
        }

        if let Some(prefix) = prefix {
            let name = entry.file_name().to_string_lossy();
            if !name.starts_with(prefix) {
                tracing::debug!(archive = %path.display(), prefix, "Skipping archive outside prefix filter");
                continue;
            }
        }

        archives.push(path.to_path_buf());
    }

    Ok(archives)
}

fn is_zip_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(ZIP_EXTENSION))
        .unwrap_or(false)
}

/// Create the output root and any missing ancestors.
///
/// Returns `true` when the directory had to be created.
pub fn ensure_output_dir(output_dir: &Path) -> Result<bool, ExtractError> {
    if output_dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(output_dir).map_err(|source| output_dir_error(output_dir, source))?;
    Ok(true)
}

fn output_dir_error(path: &Path, source: io::Error) -> ExtractError {
    ExtractError::OutputDirectory {
        path: path.to_path_buf(),
        source,
    }
}
