//! JSON-lines request/response protocol.
//!
//! Each input line is one request, tagged by `command`. Each output line is
//! one event, tagged by `type`. Progress events for an extraction stream
//! ahead of its single `complete` event; requests are handled concurrently
//! and a single writer serializes the output.

use crate::commands::{self, ExtractRequestDTO, ExtractResponse, JobSummary};
use crate::error::CommandError;
use crate::settings::{load_settings, save_settings, SettingsData};
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// A request line: optional correlation id plus the command.
#[derive(Debug, Deserialize)]
pub struct IpcRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub command: IpcCommand,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum IpcCommand {
    Extract(ExtractRequestDTO),
    LoadSettings,
    SaveSettings { settings: SettingsData },
    ListJobs,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IpcEvent {
    Progress {
        id: Option<String>,
        job_id: String,
        message: String,
    },
    Complete {
        id: Option<String>,
        response: ExtractResponse,
    },
    Settings {
        id: Option<String>,
        settings: SettingsData,
    },
    Saved {
        id: Option<String>,
    },
    Jobs {
        id: Option<String>,
        jobs: Vec<JobSummary>,
    },
    Error {
        id: Option<String>,
        error: String,
    },
}

/// Serve requests from `reader` until it reaches EOF, writing events to `writer`.
///
/// Returns after every in-flight request has produced its final event.
pub async fn serve<R, W>(
    state: AppState,
    reader: R,
    writer: W,
    settings_path: Option<PathBuf>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (events, mut outbox) = mpsc::unbounded_channel::<IpcEvent>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(event) = outbox.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => {
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize event"),
            }
        }
        Ok::<(), io::Error>(())
    });

    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<IpcRequest>(&line) {
            Ok(request) => {
                let state = state.clone();
                let events = events.clone();
                let settings_path = settings_path.clone();
                tasks.spawn(async move {
                    handle_request(&state, request, settings_path.as_deref(), &events).await;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed request");
                let _ = events.send(IpcEvent::Error {
                    id: None,
                    error: format!("Invalid request: {}", e),
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "Request handler failed");
        }
    }

    drop(events);
    writer_task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

/// Run one request to completion, emitting its events.
pub async fn handle_request(
    state: &AppState,
    request: IpcRequest,
    settings_path: Option<&Path>,
    events: &mpsc::UnboundedSender<IpcEvent>,
) {
    let id = request.id;

    let event = match request.command {
        IpcCommand::Extract(dto) => {
            let progress_id = id.clone();
            let progress_events = events.clone();
            let response = commands::extract(state, dto, move |progress| {
                let _ = progress_events.send(IpcEvent::Progress {
                    id: progress_id.clone(),
                    job_id: progress.job_id,
                    message: progress.message,
                });
            })
            .await;
            IpcEvent::Complete { id, response }
        }
        IpcCommand::LoadSettings => match require_path(settings_path) {
            Ok(path) => match load_settings(path).await {
                Ok(settings) => IpcEvent::Settings { id, settings },
                Err(e) => error_event(id, e),
            },
            Err(e) => error_event(id, e),
        },
        IpcCommand::SaveSettings { settings } => match require_path(settings_path) {
            Ok(path) => match save_settings(path, &settings).await {
                Ok(()) => IpcEvent::Saved { id },
                Err(e) => error_event(id, e),
            },
            Err(e) => error_event(id, e),
        },
        IpcCommand::ListJobs => IpcEvent::Jobs {
            id,
            jobs: commands::list_jobs(state),
        },
    };

    let _ = events.send(event);
}

fn require_path(path: Option<&Path>) -> Result<&Path, CommandError> {
    path.ok_or_else(|| CommandError::Unavailable("no settings directory on this system".to_string()))
}

fn error_event(id: Option<String>, error: CommandError) -> IpcEvent {
    IpcEvent::Error {
        id,
        error: error.to_string(),
    }
}
