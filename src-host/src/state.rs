use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Bookkeeping for a running extraction job
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub started_at: Instant,
}

/// Application state tracking in-flight extraction jobs
#[derive(Default, Clone)]
pub struct AppState {
    /// Map of job_id to JobHandle
    pub jobs: Arc<Mutex<HashMap<String, JobHandle>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a job and return its id.
    pub fn register(&self, handle: JobHandle) -> String {
        let job_id = Uuid::new_v4().to_string();
        self.jobs.lock().insert(job_id.clone(), handle);
        job_id
    }

    pub fn finish(&self, job_id: &str) -> Option<JobHandle> {
        self.jobs.lock().remove(job_id)
    }

    pub fn running(&self) -> Vec<(String, JobHandle)> {
        let jobs = self.jobs.lock();
        let mut running: Vec<_> = jobs.iter().map(|(id, h)| (id.clone(), h.clone())).collect();
        running.sort_by_key(|(_, h)| h.started_at);
        running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(input: &str) -> JobHandle {
        JobHandle {
            input_path: PathBuf::from(input),
            output_dir: PathBuf::from("out"),
            started_at: Instant::now(),
        }
    }

    #[test]
    fn test_register_and_finish() {
        let state = AppState::new();
        let first = state.register(handle("a.zip"));
        let second = state.register(handle("b.zip"));
        assert_ne!(first, second);
        assert_eq!(state.running().len(), 2);

        let finished = state.finish(&first).unwrap();
        assert_eq!(finished.input_path, PathBuf::from("a.zip"));
        assert!(state.finish(&first).is_none());
        assert_eq!(state.running()[0].0, second);
    }
}
