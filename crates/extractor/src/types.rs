//! Type definitions for ZIP extraction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use ts_rs::TS;

/// What to extract, where to, and how to lay out the result.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    /// A `.zip` file or a directory containing `.zip` files
    pub input_path: PathBuf,

    /// Root directory that receives extracted files
    pub output_dir: PathBuf,

    /// Recreate each entry's directory hierarchy instead of flattening
    pub keep_structure: bool,

    /// Only archives whose file name starts with this prefix (directory input only)
    pub prefix: Option<String>,
}

impl ExtractRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            keep_structure: false,
            prefix: None,
        }
    }

    pub fn keep_structure(mut self, keep_structure: bool) -> Self {
        self.keep_structure = keep_structure;
        self
    }

    /// Empty prefixes are treated as no filter.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Terminal outcome for a single file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOutcome {
    /// Nothing existed at the target path
    Extracted,

    /// An existing file of a different length was replaced
    Overwritten,

    /// An existing file of the same length was left untouched
    SkippedDuplicate,
}

/// Counters collected over one engine call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    /// Archives whose entries were all processed
    #[ts(type = "number")]
    pub archives_processed: u64,

    /// Archives that could not be opened or read
    #[ts(type = "number")]
    pub archives_failed: u64,

    #[ts(type = "number")]
    pub files_extracted: u64,

    #[ts(type = "number")]
    pub files_overwritten: u64,

    #[ts(type = "number")]
    pub files_skipped: u64,

    /// Entries that could not be written (the rest of their archive continued)
    #[ts(type = "number")]
    pub files_failed: u64,

    /// Total bytes written to disk
    #[ts(type = "number")]
    pub bytes_written: u64,

    /// Wall-clock duration of the call (in milliseconds)
    #[serde(with = "duration_millis")]
    #[ts(type = "number")]
    pub duration: Duration,
}

impl ExtractStats {
    pub(crate) fn record(&mut self, outcome: EntryOutcome, bytes: u64) {
        match outcome {
            EntryOutcome::Extracted => self.files_extracted += 1,
            EntryOutcome::Overwritten => self.files_overwritten += 1,
            EntryOutcome::SkippedDuplicate => self.files_skipped += 1,
        }
        if outcome != EntryOutcome::SkippedDuplicate {
            self.bytes_written += bytes;
        }
    }

    /// Entries that reached one of the three terminal outcomes.
    pub fn files_resolved(&self) -> u64 {
        self.files_extracted + self.files_overwritten + self.files_skipped
    }
}

/// Result of one engine call: the log feed plus counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../bindings/")]
pub struct ExtractReport {
    /// Human-readable lines, in the order they happened
    pub logs: Vec<String>,

    pub stats: ExtractStats,
}

impl ExtractReport {
    pub(crate) fn push(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ExtractRequest::new("in.zip", "out")
            .keep_structure(true)
            .with_prefix(Some("mods_".to_string()));

        assert!(request.keep_structure);
        assert_eq!(request.prefix.as_deref(), Some("mods_"));
        assert_eq!(request.output_dir(), Path::new("out"));
    }

    #[test]
    fn test_empty_prefix_is_no_filter() {
        let request = ExtractRequest::new("in", "out").with_prefix(Some(String::new()));
        assert!(request.prefix.is_none());
    }

    #[test]
    fn test_stats_record() {
        let mut stats = ExtractStats::default();
        stats.record(EntryOutcome::Extracted, 10);
        stats.record(EntryOutcome::Overwritten, 5);
        stats.record(EntryOutcome::SkippedDuplicate, 99);

        assert_eq!(stats.files_resolved(), 3);
        assert_eq!(stats.bytes_written, 15);
    }

    #[test]
    fn test_stats_serialize_camel_case_millis() {
        let stats = ExtractStats {
            files_extracted: 2,
            duration: Duration::from_millis(1500),
            ..Default::default()
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["filesExtracted"], 2);
        assert_eq!(json["duration"], 1500);
    }
}
