// strata-core/src/ports/review_store.rs

use std::collections::HashSet;

use crate::domain::project::ReviewColumns;
use crate::domain::review::{FactSnapshot, RawReview, ResolvedWindow, ReviewFact};
use crate::error::StrataError;
use async_trait::async_trait;

/// Typed access to the review relations used by the incremental loader.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// State and high-water mark of the fact table, with no persisted keys.
    /// A missing table yields `FactSnapshot::uninitialized()`.
    async fn fact_snapshot(&self, fact_table: &str) -> Result<FactSnapshot, StrataError>;

    /// Keys of the rows whose `review_date` falls inside `window`.
    /// Empty when the table does not exist.
    async fn persisted_ids(
        &self,
        fact_table: &str,
        window: &ResolvedWindow,
    ) -> Result<HashSet<String>, StrataError>;

    async fn fetch_raw_reviews(
        &self,
        source: &str,
        columns: &ReviewColumns,
    ) -> Result<Vec<RawReview>, StrataError>;

    /// Creates the fact table if needed and inserts `rows`, all in one
    /// transaction. Returns the number of rows inserted.
    async fn append_reviews(&self, fact_table: &str, rows: &[ReviewFact])
    -> Result<u64, StrataError>;
}
