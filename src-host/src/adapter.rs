//! Seam between the extraction host and a concrete UI.
//!
//! Native pickers and log views live behind [`HostAdapter`]; the engine and
//! the command layer never reach for them directly.

use crate::commands::{self, ExtractRequestDTO, ExtractResponse};
use crate::state::AppState;
use std::path::PathBuf;

/// What a UI must provide to drive an extraction session.
pub trait HostAdapter {
    /// Ask the user for a `.zip` file or a folder. `None` means cancelled.
    fn pick_input_path(&mut self) -> Option<PathBuf>;

    /// Ask the user for the output folder. `None` means cancelled.
    fn pick_output_path(&mut self) -> Option<PathBuf>;

    /// Display a completed extraction log, verbatim and in order.
    fn show_log(&mut self, lines: &[String]);

    /// Display a single actionable error.
    fn show_error(&mut self, error: &str);

    fn show_progress(&mut self, _message: &str) {}
}

/// Pick paths, run one extraction on a worker, and show the outcome.
///
/// Returns `None` when the user cancels either picker.
pub async fn run_session<A>(
    adapter: &mut A,
    state: &AppState,
    keep_structure: bool,
) -> Option<ExtractResponse>
where
    A: HostAdapter,
{
    let input_path = adapter.pick_input_path()?;
    let output_dir = adapter.pick_output_path()?;

    let request = ExtractRequestDTO {
        input_path: input_path.to_string_lossy().to_string(),
        output_dir: output_dir.to_string_lossy().to_string(),
        keep_structure,
        prefix: None,
    };

    let response = commands::extract(state, request, |progress| {
        adapter.show_progress(&progress.message)
    })
    .await;

    match (&response.logs, &response.error) {
        (Some(logs), _) if response.success => adapter.show_log(logs),
        (_, Some(error)) => adapter.show_error(error),
        _ => adapter.show_error("Extraction finished without a result"),
    }

    Some(response)
}
