// strata-core/src/ports/mod.rs

pub mod connector;
pub mod recorder;
pub mod review_store;

pub use connector::{ColumnSchema, Connector};
pub use recorder::{AuditEntry, RunKind, RunRecorder, RunStatus};
pub use review_store::ReviewStore;
