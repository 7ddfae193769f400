// strata-core/src/domain/quality/row_count.rs

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowCountError {
    #[error("Row count below threshold: {actual} rows (minimum {minimum}, missing {missing})")]
    BelowMinimum {
        actual: u64,
        minimum: u64,
        missing: u64,
    },
}

pub struct RowCountCheck;

impl RowCountCheck {
    /// Check the fact table holds at least `minimum` rows.
    ///
    /// # Arguments
    /// * `actual` - Rows currently in the table.
    /// * `minimum` - Configured threshold (0 disables the check).
    pub fn validate(actual: u64, minimum: u64) -> Result<(), RowCountError> {
        if actual >= minimum {
            return Ok(());
        }
        Err(RowCountError::BelowMinimum {
            actual,
            minimum,
            missing: minimum - actual,
        })
    }
}
