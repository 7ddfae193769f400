// strata-core/src/ports/recorder.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StrataError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Load,
    Test,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failure,
}

/// One line of the audit trail, written once per invocation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuditEntry {
    pub invocation_id: String,
    pub kind: RunKind,
    pub recorded_at: DateTime<Utc>,
    pub relation: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_scanned: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_appended: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_checks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuditEntry {
    pub fn new(invocation_id: &str, kind: RunKind, relation: &str, status: RunStatus) -> Self {
        Self {
            invocation_id: invocation_id.to_string(),
            kind,
            recorded_at: Utc::now(),
            relation: relation.to_string(),
            status,
            window: None,
            rows_scanned: None,
            rows_appended: None,
            failed_checks: None,
            message: None,
        }
    }
}

/// Audit capability handed to the use cases by the caller.
pub trait RunRecorder: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> Result<(), StrataError>;
}
