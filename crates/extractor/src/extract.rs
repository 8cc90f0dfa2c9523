//! Batch ZIP extraction with per-archive and per-entry error isolation.

use crate::classify::{classify_input, ensure_output_dir, InputKind};
use crate::error::ExtractError;
use crate::progress::{checkpoint, ProgressCallback, ProgressReporter};
use crate::safety::relative_target;
use crate::types::{EntryOutcome, ExtractReport, ExtractRequest};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use zip::ZipArchive;

/// Upper bound on the buffer reserved up front for one entry.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Extract a single archive or a directory of archives.
///
/// Only invalid input and an uncreatable output root fail the call. Archive
/// and entry failures become log lines and the batch moves on.
pub async fn extract_input(
    request: &ExtractRequest,
    progress_cb: Option<&ProgressCallback>,
) -> Result<ExtractReport, ExtractError> {
    let start_time = Instant::now();
    let mut reporter = ProgressReporter::new(progress_cb);
    let mut report = ExtractReport::default();

    let input = classify_input(&request.input_path, request.prefix.as_deref())?;

    if let (InputKind::Directory { .. }, Some(prefix)) = (&input, &request.prefix) {
        report.push(format!("🔍 Filtering files starting with: \"{}\"", prefix));
    }

    if ensure_output_dir(&request.output_dir)? {
        let line = format!(
            "📁 Creating output directory: \"{}\"",
            request.output_dir.display()
        );
        reporter.emit(&line).await;
        report.push(line);
    } else {
        report.push(format!(
            "⚠️ Output directory \"{}\" already exists.",
            request.output_dir.display()
        ));
    }

    match input {
        InputKind::Archive(archive_path) => {
            tracing::info!(archive = %archive_path.display(), "Processing single zip file");
            report.push(format!(
                "Processing single zip file: {}",
                archive_path.display()
            ));
            extract_archive(&archive_path, request, &mut reporter, &mut report).await;
        }
        InputKind::Directory { dir, archives } => {
            if archives.is_empty() {
                report.push(format!("⚠️ No .zip files found in \"{}\"", dir.display()));
            } else {
                let line = format!("📦 Found {} zip files. Extracting...", archives.len());
                reporter.emit(&line).await;
                report.push(line);

                for archive_path in &archives {
                    extract_archive(archive_path, request, &mut reporter, &mut report).await;
                    checkpoint().await;
                }
            }
        }
    }

    report.stats.duration = start_time.elapsed();
    Ok(report)
}

/// Extract every file entry of one archive into the output root.
///
/// Never fails: an archive that cannot be opened or read is recorded as a
/// single failure line, after whatever entries were already handled.
pub async fn extract_archive(
    archive_path: &Path,
    request: &ExtractRequest,
    reporter: &mut ProgressReporter<'_>,
    report: &mut ExtractReport,
) {
    let archive_name = display_name(archive_path);
    reporter
        .emit(&format!("📂 Extracting: \"{}\"", archive_name))
        .await;

    match extract_entries(archive_path, &archive_name, request, reporter, report).await {
        Ok(written) => {
            report.stats.archives_processed += 1;
            report.push(format!(
                "✅ Extracted {} → {} ({} files)",
                archive_name,
                request.output_dir.display(),
                written
            ));
            reporter
                .emit(&format!("✅ Finished \"{}\"", archive_name))
                .await;
        }
        Err(e) => {
            tracing::warn!(archive = %archive_path.display(), error = %e, "Failed to extract archive");
            report.stats.archives_failed += 1;
            report.push(format!("❌ Failed to extract \"{}\": {}", archive_name, e));
            reporter
                .emit(&format!("❌ Failed \"{}\"", archive_name))
                .await;
        }
    }
}

/// Walk the entries of one archive in container order.
///
/// Returns the number of files written (extracted or overwritten). Entry
/// write failures are logged here and do not abort the archive; read
/// failures do.
async fn extract_entries(
    archive_path: &Path,
    archive_name: &str,
    request: &ExtractRequest,
    reporter: &mut ProgressReporter<'_>,
    report: &mut ExtractReport,
) -> Result<u64, ExtractError> {
    let file = File::open(archive_path).map_err(zip::result::ZipError::from)?;
    let mut archive = ZipArchive::new(file)?;

    let mut processed = 0usize;
    let mut written = 0u64;

    for index in 0..archive.len() {
        let (entry_name, data) = {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }

            // declared size is untrusted; read_to_end grows past the hint
            let hint = entry.size().min(MAX_PREALLOC);
            let mut data = Vec::with_capacity(usize::try_from(hint).unwrap_or(0));
            entry
                .read_to_end(&mut data)
                .map_err(zip::result::ZipError::from)?;
            (entry.name().to_string(), data)
        };

        match resolve_and_write(&request.output_dir, &entry_name, &data, request.keep_structure) {
            Ok((relative, outcome)) => {
                tracing::debug!(entry = %entry_name, ?outcome, "Entry resolved");
                report.stats.record(outcome, data.len() as u64);
                if outcome != EntryOutcome::SkippedDuplicate {
                    written += 1;
                }
                report.push(outcome_line(outcome, &relative));
            }
            Err(e) => {
                tracing::warn!(entry = %entry_name, error = %e, "Failed to write entry");
                report.stats.files_failed += 1;
                report.push(format!("❌ Failed to write file: {}: {}", entry_name, e));
            }
        }

        processed += 1;
        reporter.file_processed(archive_name, processed).await;
    }

    Ok(written)
}

fn resolve_and_write(
    output_root: &Path,
    entry_name: &str,
    data: &[u8],
    keep_structure: bool,
) -> Result<(PathBuf, EntryOutcome), ExtractError> {
    let relative = relative_target(entry_name, keep_structure)?;
    let outcome = write_entry(&output_root.join(&relative), data)?;
    Ok((relative, outcome))
}

/// Write `data` to `target`, applying the length-based conflict policy.
///
/// An existing file with the same byte length as `data` counts as identical
/// and is left alone. Content is not compared, so two different payloads of
/// equal length are treated as duplicates.
pub fn write_entry(target: &Path, data: &[u8]) -> Result<EntryOutcome, ExtractError> {
    let existed = match fs::metadata(target) {
        Ok(meta) if meta.is_file() && meta.len() == data.len() as u64 => {
            return Ok(EntryOutcome::SkippedDuplicate);
        }
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(source) => {
            return Err(ExtractError::EntryWrite {
                path: target.to_path_buf(),
                source,
            })
        }
    };

    let write = || -> io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, data)
    };
    write().map_err(|source| ExtractError::EntryWrite {
        path: target.to_path_buf(),
        source,
    })?;

    Ok(if existed {
        EntryOutcome::Overwritten
    } else {
        EntryOutcome::Extracted
    })
}

fn outcome_line(outcome: EntryOutcome, relative: &Path) -> String {
    match outcome {
        EntryOutcome::Extracted => format!("✅ Extracted file: {}", relative.display()),
        EntryOutcome::Overwritten => format!("♻️ Overwrote file: {}", relative.display()),
        EntryOutcome::SkippedDuplicate => {
            format!("⚠️ Skipping duplicate file: {}", relative.display())
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_entry_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("x.txt");

        let outcome = write_entry(&target, b"0123456789").unwrap();
        assert_eq!(outcome, EntryOutcome::Extracted);
        assert_eq!(fs::read(&target).unwrap(), b"0123456789");
    }

    #[test]
    fn test_write_entry_same_length_is_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("x.txt");
        fs::write(&target, b"aaaa").unwrap();

        // different bytes, same length: still a duplicate
        let outcome = write_entry(&target, b"bbbb").unwrap();
        assert_eq!(outcome, EntryOutcome::SkippedDuplicate);
        assert_eq!(fs::read(&target).unwrap(), b"aaaa");
    }

    #[test]
    fn test_write_entry_different_length_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("x.txt");
        fs::write(&target, b"short").unwrap();

        let outcome = write_entry(&target, b"a longer payload").unwrap();
        assert_eq!(outcome, EntryOutcome::Overwritten);
        assert_eq!(fs::read(&target).unwrap(), b"a longer payload");
    }

    #[test]
    fn test_write_entry_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a/b/x.txt");

        assert_eq!(write_entry(&target, b"x").unwrap(), EntryOutcome::Extracted);
        assert!(temp_dir.path().join("a/b").is_dir());
    }

    #[test]
    fn test_write_entry_onto_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        let result = write_entry(&target, b"payload");
        assert!(matches!(result, Err(ExtractError::EntryWrite { .. })));
    }

    #[test]
    fn test_outcome_lines() {
        let path = Path::new("a/x.txt");
        assert!(outcome_line(EntryOutcome::Extracted, path).starts_with("✅ Extracted file:"));
        assert!(outcome_line(EntryOutcome::Overwritten, path).starts_with("♻️ Overwrote file:"));
        assert!(outcome_line(EntryOutcome::SkippedDuplicate, path)
            .starts_with("⚠️ Skipping duplicate file:"));
    }
}
