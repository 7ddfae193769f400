// strata-core/src/domain/quality/mod.rs

pub mod check;
pub mod row_count;

pub use check::{CheckKind, CheckOutcome, CheckStatus, QualityReport, Severity};
pub use row_count::{RowCountCheck, RowCountError};
