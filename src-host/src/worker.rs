//! Runs the extraction engine off the caller's thread.

use extractor::{ExtractReport, ExtractRequest};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One-way messages from a worker back to the host.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Advisory progress text
    Progress(String),

    /// Terminal message, sent exactly once unless the worker panics
    Complete(Result<ExtractReport, String>),
}

/// Start an extraction on the blocking pool.
///
/// The engine's file I/O is synchronous, so it runs on a blocking thread and
/// drives its own cooperative yields there. Must be called from within a
/// tokio runtime.
pub fn spawn_extraction(
    request: ExtractRequest,
) -> (mpsc::UnboundedReceiver<WorkerMessage>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = Handle::current();

    let task = tokio::task::spawn_blocking(move || {
        let progress_tx = tx.clone();
        let progress_cb = move |message: &str| {
            // receiver gone means nobody is watching; the job still finishes
            let _ = progress_tx.send(WorkerMessage::Progress(message.to_string()));
        };

        tracing::info!(input = %request.input_path.display(), "Worker started");
        let result = handle.block_on(extractor::extract_zips(&request, Some(&progress_cb)));
        let _ = tx.send(WorkerMessage::Complete(result.map_err(|e| e.to_string())));
    });

    (rx, task)
}
