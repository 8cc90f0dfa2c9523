//! Progress reporting and cooperative yielding.
//!
//! The observer is side-channel only. Everything the engine decides is
//! captured in the returned report whether or not a callback is attached.

/// Progress observer. Receives one human-readable message per call.
pub type ProgressCallback = dyn Fn(&str) + Send + Sync;

/// Emit an in-archive progress message every this many files.
pub const PROGRESS_INTERVAL: usize = 5;

/// Forwards messages to an optional observer and yields to the scheduler
/// after each one.
pub struct ProgressReporter<'a> {
    callback: Option<&'a ProgressCallback>,
    emitted: usize,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(callback: Option<&'a ProgressCallback>) -> Self {
        Self {
            callback,
            emitted: 0,
        }
    }

    /// Send `message` to the observer, then yield.
    pub async fn emit(&mut self, message: &str) {
        if let Some(cb) = self.callback {
            cb(message);
        }
        self.emitted += 1;
        checkpoint().await;
    }

    /// Periodic in-archive message after `processed` files.
    pub async fn file_processed(&mut self, archive: &str, processed: usize) {
        if is_report_point(processed) {
            self.emit(&format!("   ➡️  {}: {} files processed", archive, processed))
                .await;
        }
    }

    /// Number of progress points reached so far, observer or not.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Whether the `processed`-th file is a periodic reporting point.
pub fn is_report_point(processed: usize) -> bool {
    processed > 0 && processed % PROGRESS_INTERVAL == 0
}

/// Hand control back to the scheduler so a host UI or I/O loop sharing the
/// thread can make progress.
pub async fn checkpoint() {
    tokio::task::yield_now().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_points() {
        assert!(!is_report_point(0));
        assert!(!is_report_point(4));
        assert!(is_report_point(5));
        assert!(!is_report_point(6));
        assert!(is_report_point(10));
    }

    #[tokio::test]
    async fn test_emit_reaches_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let cb = move |msg: &str| seen_clone.lock().unwrap().push(msg.to_string());

        let mut reporter = ProgressReporter::new(Some(&cb));
        reporter.emit("starting").await;
        for processed in 1..=10 {
            reporter.file_processed("a.zip", processed).await;
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], "starting");
        assert!(seen[1].contains("a.zip: 5 files processed"));
        assert!(seen[2].contains("a.zip: 10 files processed"));
        assert_eq!(reporter.emitted(), 3);
    }

    #[tokio::test]
    async fn test_reporter_without_observer() {
        let mut reporter = ProgressReporter::new(None);
        reporter.emit("nobody listening").await;
        reporter.file_processed("a.zip", 5).await;
        assert_eq!(reporter.emitted(), 2);
    }
}
