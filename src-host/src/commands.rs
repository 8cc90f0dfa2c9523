use crate::state::{AppState, JobHandle};
use crate::worker::{spawn_extraction, WorkerMessage};
use extractor::{ExtractReport, ExtractRequest, ExtractStats};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use ts_rs::TS;

/// DTO for an extraction request from the frontend
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequestDTO {
    pub input_path: String,
    pub output_dir: String,
    #[serde(default)]
    pub keep_structure: bool,
    #[serde(default)]
    #[ts(optional)]
    pub prefix: Option<String>,
}

impl From<ExtractRequestDTO> for ExtractRequest {
    fn from(dto: ExtractRequestDTO) -> Self {
        ExtractRequest::new(dto.input_path, dto.output_dir)
            .keep_structure(dto.keep_structure)
            .with_prefix(dto.prefix)
    }
}

/// Final answer to an extraction request.
///
/// Either `{success: true, logs}` or `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub logs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub stats: Option<ExtractStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl ExtractResponse {
    pub fn completed(report: ExtractReport) -> Self {
        Self {
            success: true,
            logs: Some(report.logs),
            stats: Some(report.stats),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            logs: None,
            stats: None,
            error: Some(error.into()),
        }
    }
}

/// Progress event payload
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub job_id: String,
    pub message: String,
}

/// A running job as reported to the frontend
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job_id: String,
    pub input_path: String,
    pub output_dir: String,
    #[ts(type = "number")]
    pub elapsed_ms: u64,
}

/// An extraction running on a worker, registered in the app state.
pub struct ExtractJob {
    pub job_id: String,
    state: AppState,
    messages: mpsc::UnboundedReceiver<WorkerMessage>,
    task: JoinHandle<()>,
}

/// Start an extraction on a worker and register it as a running job.
pub fn start_extract(state: &AppState, request: ExtractRequestDTO) -> ExtractJob {
    let request: ExtractRequest = request.into();
    let job_id = state.register(JobHandle {
        input_path: request.input_path.clone(),
        output_dir: request.output_dir.clone(),
        started_at: Instant::now(),
    });

    let (messages, task) = spawn_extraction(request);
    tracing::info!(job_id = %job_id, "Extraction job started");

    ExtractJob {
        job_id,
        state: state.clone(),
        messages,
        task,
    }
}

impl ExtractJob {
    /// Forward progress to `on_progress` until the worker completes.
    pub async fn wait<F>(mut self, mut on_progress: F) -> ExtractResponse
    where
        F: FnMut(ProgressEvent),
    {
        let mut response = None;

        while let Some(message) = self.messages.recv().await {
            match message {
                WorkerMessage::Progress(message) => on_progress(ProgressEvent {
                    job_id: self.job_id.clone(),
                    message,
                }),
                WorkerMessage::Complete(Ok(report)) => {
                    response = Some(ExtractResponse::completed(report));
                }
                WorkerMessage::Complete(Err(error)) => {
                    response = Some(ExtractResponse::failed(error));
                }
            }
        }

        // Channel closes once the worker returns (or unwinds)
        let joined = (&mut self.task).await;
        self.state.finish(&self.job_id);

        match (response, joined) {
            (Some(response), _) => response,
            (None, Err(join_err)) => {
                tracing::error!(job_id = %self.job_id, error = %join_err, "Worker failed");
                ExtractResponse::failed(format!("Extraction worker stopped: {}", join_err))
            }
            (None, Ok(())) => ExtractResponse::failed("Extraction worker exited without a result"),
        }
    }
}

/// Extract one ZIP file or a folder of ZIP files.
///
/// Progress is streamed through `on_progress`; the returned response is the
/// single terminal message.
pub async fn extract<F>(state: &AppState, request: ExtractRequestDTO, on_progress: F) -> ExtractResponse
where
    F: FnMut(ProgressEvent),
{
    start_extract(state, request).wait(on_progress).await
}

/// Jobs that have not completed yet, oldest first
pub fn list_jobs(state: &AppState) -> Vec<JobSummary> {
    state
        .running()
        .into_iter()
        .map(|(job_id, handle)| JobSummary {
            job_id,
            input_path: handle.input_path.to_string_lossy().to_string(),
            output_dir: handle.output_dir.to_string_lossy().to_string(),
            elapsed_ms: handle.started_at.elapsed().as_millis() as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_defaults() {
        let dto: ExtractRequestDTO =
            serde_json::from_str(r#"{"inputPath": "in", "outputDir": "out"}"#).unwrap();
        assert!(!dto.keep_structure);
        assert!(dto.prefix.is_none());

        let request: ExtractRequest = dto.into();
        assert!(!request.keep_structure);
    }

    #[test]
    fn test_failed_response_shape() {
        let json = serde_json::to_value(ExtractResponse::failed("Invalid input path")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid input path");
        assert!(json.get("logs").is_none());
    }

    #[test]
    fn test_completed_response_shape() {
        let report = ExtractReport {
            logs: vec!["✅ Extracted file: x.txt".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(ExtractResponse::completed(report)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["logs"][0], "✅ Extracted file: x.txt");
        assert!(json.get("error").is_none());
    }
}
