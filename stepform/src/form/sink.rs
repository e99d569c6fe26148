// Submission sinks: where a finalized record goes once the wizard accepts it.

use crate::models::submission::FinalizedSubmission;
use crate::utils::logging::mask_json_secrets;
use log::{info, warn};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub trait SubmissionSink: Send + Sync {
    fn submit(&self, record: &FinalizedSubmission);
}

impl<F> SubmissionSink for F
where
    F: Fn(&FinalizedSubmission) + Send + Sync,
{
    fn submit(&self, record: &FinalizedSubmission) {
        self(record)
    }
}

pub type SharedSink = Arc<dyn SubmissionSink>;

/// Writes each record to the log as pretty JSON, with secrets masked.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubmissionSink;

impl SubmissionSink for LogSubmissionSink {
    fn submit(&self, record: &FinalizedSubmission) {
        let correlation_id = Uuid::new_v4().simple().to_string();
        let mut doc = match serde_json::to_value(record) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "[PHASE: submit] [STEP: sink] correlation_id={} could not serialize record: {}",
                    correlation_id, e
                );
                return;
            }
        };
        mask_json_secrets(&mut doc);
        let pretty = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string());
        info!(
            "[PHASE: submit] [STEP: sink] Form Data Submitted (correlation_id={}):\n{}",
            correlation_id, pretty
        );
    }
}

/// Keeps every record in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySubmissionSink {
    records: Arc<Mutex<Vec<FinalizedSubmission>>>,
}

impl MemorySubmissionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FinalizedSubmission> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SubmissionSink for MemorySubmissionSink {
    fn submit(&self, record: &FinalizedSubmission) {
        match self.records.lock() {
            Ok(mut guard) => guard.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
    }
}
