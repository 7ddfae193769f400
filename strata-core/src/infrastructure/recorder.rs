// strata-core/src/infrastructure/recorder.rs

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StrataError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::append_line;
use crate::ports::recorder::{AuditEntry, RunRecorder, RunStatus};

/// Appends each entry as one JSON line to `<target>/audit_log.jsonl`.
pub struct JsonlAuditLog {
    path: PathBuf,
}

impl JsonlAuditLog {
    pub const FILE_NAME: &'static str = "audit_log.jsonl";

    pub fn in_target_dir(target_dir: &Path) -> Self {
        Self {
            path: target_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunRecorder for JsonlAuditLog {
    fn record(&self, entry: &AuditEntry) -> Result<(), StrataError> {
        let line = serde_json::to_string(entry).map_err(InfrastructureError::JsonError)?;
        append_line(&self.path, &line)?;
        Ok(())
    }
}

/// Emits entries as `tracing` events only.
pub struct TracingRecorder;

impl RunRecorder for TracingRecorder {
    fn record(&self, entry: &AuditEntry) -> Result<(), StrataError> {
        info!(
            invocation_id = %entry.invocation_id,
            kind = ?entry.kind,
            relation = %entry.relation,
            success = entry.status == RunStatus::Success,
            rows_appended = ?entry.rows_appended,
            failed_checks = ?entry.failed_checks,
            "audit"
        );
        Ok(())
    }
}

/// Fans an entry out to several recorders; stops at the first error.
pub struct CompositeRecorder {
    recorders: Vec<Box<dyn RunRecorder>>,
}

impl CompositeRecorder {
    pub fn new(recorders: Vec<Box<dyn RunRecorder>>) -> Self {
        Self { recorders }
    }
}

impl RunRecorder for CompositeRecorder {
    fn record(&self, entry: &AuditEntry) -> Result<(), StrataError> {
        for recorder in &self.recorders {
            recorder.record(entry)?;
        }
        Ok(())
    }
}
