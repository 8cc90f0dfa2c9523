//! # Extractor
//!
//! Batch extraction of ZIP archives into a single output directory.
//!
//! The input is either one `.zip` file or a directory whose `.zip` files are
//! all extracted, one after another, into the same output root. Entries are
//! either flattened to their base filename or written under their full
//! relative path. When a target file already exists, a file of the same byte
//! length is treated as a duplicate and skipped; any other length is
//! overwritten.
//!
//! Failures are isolated: a corrupt archive or an unwritable entry becomes a
//! log line and the batch carries on. Only an invalid input path or an output
//! directory that cannot be created fail the call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use extractor::{extract_zips_blocking, ExtractRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = ExtractRequest::new("downloads/", "output/").keep_structure(false);
//! let progress_cb = |message: &str| println!("{}", message);
//!
//! let report = extract_zips_blocking(&request, Some(&progress_cb))?;
//! for line in &report.logs {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod extract;
pub mod progress;
pub mod safety;
pub mod types;

// Re-export main types
pub use classify::InputKind;
pub use error::{ExtractError, SecurityError};
pub use progress::{ProgressCallback, PROGRESS_INTERVAL};
pub use types::{EntryOutcome, ExtractReport, ExtractRequest, ExtractStats};

/// Extract a ZIP file, or every ZIP file in a directory, into the output directory.
///
/// The engine runs on the calling task and yields to the scheduler after
/// every progress point and between archives, so it can share a
/// single-threaded runtime with a UI or I/O loop.
///
/// # Arguments
///
/// * `request` - Input path, output directory, structure flag and prefix filter
/// * `progress_cb` - Optional observer for human-readable progress messages
///
/// # Errors
///
/// Returns an error if:
/// - The input path is neither a `.zip` file nor a directory
/// - The output directory cannot be created
pub async fn extract_zips(
    request: &ExtractRequest,
    progress_cb: Option<&ProgressCallback>,
) -> Result<ExtractReport, ExtractError> {
    extract::extract_input(request, progress_cb).await
}

/// Blocking form of [`extract_zips`] for callers without an async runtime.
///
/// Must not be called from inside an async context.
pub fn extract_zips_blocking(
    request: &ExtractRequest,
    progress_cb: Option<&ProgressCallback>,
) -> Result<ExtractReport, ExtractError> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(extract_zips(request, progress_cb))
}
