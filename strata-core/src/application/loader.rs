// strata-core/src/application/loader.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::domain::project::ReviewsConfig;
use crate::domain::review::{
    IncrementalLoader, LoadOptions, LoaderState, ResolvedWindow, SkipCounts,
};
use crate::error::StrataError;
use crate::ports::recorder::{AuditEntry, RunKind, RunRecorder, RunStatus};
use crate::ports::review_store::ReviewStore;

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub invocation_id: String,
    pub relation: String,
    pub state_before: LoaderState,
    pub window: ResolvedWindow,
    pub rows_scanned: u64,
    pub rows_appended: u64,
    pub skipped: SkipCounts,
}

impl LoadReport {
    pub fn was_full_load(&self) -> bool {
        self.state_before == LoaderState::Uninitialized
    }
}

/// Everything a load needs besides the store and the recorder.
pub struct LoadRequest<'a> {
    pub reviews: &'a ReviewsConfig,
    pub options: LoadOptions,
    pub invocation_id: &'a str,
    pub today: NaiveDate,
}

/// Snapshot -> read raw -> plan (pure) -> append (one transaction) -> audit.
///
/// The recorder is called exactly once, with a failure entry if any step
/// errors out. Two concurrent loads against the same table can read the same
/// high-water mark; runs are expected to be serialized by the caller.
///
/// Only the persisted keys dated inside the load window are held in memory.
/// Under the high-water-mark policy that set is empty; an explicit or
/// full-history window reads every key it covers.
#[instrument(
    skip_all,
    fields(
        fact_table = %request.reviews.fact_table,
        invocation_id = %request.invocation_id
    )
)]
pub async fn run_incremental_load(
    store: &dyn ReviewStore,
    recorder: &dyn RunRecorder,
    request: LoadRequest<'_>,
) -> Result<LoadReport, StrataError> {
    let start = Instant::now();

    if request.options.request.is_partial() {
        warn!(
            "Only one of start_date/end_date was supplied; ignoring it and using the '{}' default window",
            request.options.default_window
        );
    }

    let result = load(store, &request).await;

    let (entry, outcome) = match result {
        Ok(report) => {
            let mut entry = AuditEntry::new(
                request.invocation_id,
                RunKind::Load,
                &request.reviews.fact_table,
                RunStatus::Success,
            );
            entry.window = Some(report.window.to_string());
            entry.rows_scanned = Some(report.rows_scanned);
            entry.rows_appended = Some(report.rows_appended);
            (entry, Ok(report))
        }
        Err(e) => {
            let mut entry = AuditEntry::new(
                request.invocation_id,
                RunKind::Load,
                &request.reviews.fact_table,
                RunStatus::Failure,
            );
            entry.message = Some(e.to_string());
            (entry, Err(e))
        }
    };

    recorder.record(&entry)?;
    debug!("Load finished in {:.2?}", start.elapsed());
    outcome
}

async fn load(
    store: &dyn ReviewStore,
    request: &LoadRequest<'_>,
) -> Result<LoadReport, StrataError> {
    let reviews = request.reviews;

    // 1. Current state of the fact table. A review's key covers its date, so
    // only keys inside the window can collide with the batch.
    let mut snapshot = store.fact_snapshot(&reviews.fact_table).await?;
    if snapshot.state == LoaderState::Initialized {
        let window = request.options.window(snapshot.high_water_mark, request.today);
        snapshot.existing_ids = store.persisted_ids(&reviews.fact_table, &window).await?;
    }
    debug!(
        state = ?snapshot.state,
        high_water_mark = ?snapshot.high_water_mark,
        persisted = snapshot.existing_ids.len(),
        "Fact table snapshot"
    );

    // 2. Raw rows
    let raw = store
        .fetch_raw_reviews(&reviews.source, &reviews.columns)
        .await?;

    // 3. Filter / key / dedup
    let plan = IncrementalLoader::plan(raw, &snapshot, &request.options, request.today);
    if plan.window.is_empty() {
        info!(window = %plan.window, "Empty date window, nothing can be loaded");
    }

    // 4. Append (creates the table on the first run)
    let appended = store.append_reviews(&reviews.fact_table, &plan.rows).await?;

    info!(
        window = %plan.window,
        scanned = plan.scanned,
        appended,
        skipped = plan.skipped.total(),
        full_load = plan.is_full_load(),
        "Incremental load complete"
    );

    Ok(LoadReport {
        invocation_id: request.invocation_id.to_string(),
        relation: reviews.fact_table.clone(),
        state_before: plan.state,
        window: plan.window,
        rows_scanned: plan.scanned,
        rows_appended: appended,
        skipped: plan.skipped,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::project::ReviewColumns;
    use crate::domain::review::{FactSnapshot, RawReview, ReviewFact, WindowRequest};
    use crate::infrastructure::adapters::duckdb::DuckDBConnector;
    use crate::ports::connector::Connector;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // --- MOCK RECORDER ---
    #[derive(Default)]
    struct MemoryRecorder {
        entries: Mutex<Vec<AuditEntry>>,
    }

    impl RunRecorder for MemoryRecorder {
        fn record(&self, entry: &AuditEntry) -> Result<(), StrataError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    // --- MOCK STORE ---
    struct FailingStore;

    #[async_trait]
    impl ReviewStore for FailingStore {
        async fn fact_snapshot(&self, _fact_table: &str) -> Result<FactSnapshot, StrataError> {
            Ok(FactSnapshot::uninitialized())
        }
        async fn persisted_ids(
            &self,
            _fact_table: &str,
            _window: &ResolvedWindow,
        ) -> Result<HashSet<String>, StrataError> {
            Ok(HashSet::new())
        }
        async fn fetch_raw_reviews(
            &self,
            _source: &str,
            _columns: &ReviewColumns,
        ) -> Result<Vec<RawReview>, StrataError> {
            Err(std::io::Error::other("source offline").into())
        }
        async fn append_reviews(
            &self,
            _fact_table: &str,
            _rows: &[ReviewFact],
        ) -> Result<u64, StrataError> {
            Ok(0)
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn seeded_connector(rows: &str) -> DuckDBConnector {
        let connector = DuckDBConnector::new(":memory:").unwrap();
        connector
            .execute(&format!(
                "CREATE TABLE raw_reviews (listing_id BIGINT, review_date DATE, reviewer_name VARCHAR, review_text VARCHAR);
                 INSERT INTO raw_reviews VALUES {};",
                rows
            ))
            .await
            .unwrap();
        connector
    }

    fn request<'a>(
        reviews: &'a ReviewsConfig,
        options: LoadOptions,
        id: &'a str,
    ) -> LoadRequest<'a> {
        LoadRequest {
            reviews,
            options,
            invocation_id: id,
            today: d(2024, 12, 31),
        }
    }

    #[tokio::test]
    async fn test_scenario_single_review_then_rerun() {
        let connector = seeded_connector("(42, DATE '2024-03-10', 'Alex', 'Great stay')").await;
        let recorder = MemoryRecorder::default();
        let reviews = ReviewsConfig::default();

        let first = run_incremental_load(
            &connector,
            &recorder,
            request(&reviews, LoadOptions::default(), "run-1"),
        )
        .await
        .unwrap();
        assert!(first.was_full_load());
        assert_eq!(first.rows_appended, 1);

        let second = run_incremental_load(
            &connector,
            &recorder,
            request(&reviews, LoadOptions::default(), "run-2"),
        )
        .await
        .unwrap();
        assert!(!second.was_full_load());
        assert_eq!(second.rows_appended, 0);

        assert_eq!(
            connector.query_scalar("SELECT count(*) FROM fct_reviews").await.unwrap(),
            1
        );
        assert_eq!(
            connector
                .query_scalar("SELECT count(*) FROM fct_reviews WHERE review_id IS NULL")
                .await
                .unwrap(),
            0
        );

        let entries = recorder.entries.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rows_appended, Some(1));
        assert_eq!(entries[1].rows_appended, Some(0));
        assert!(entries.iter().all(|e| e.status == RunStatus::Success));
    }

    #[tokio::test]
    async fn test_explicit_window_rerun_does_not_duplicate() {
        let connector = seeded_connector(
            "(1, DATE '2024-01-05', 'Ana', 'Nice'),
             (2, DATE '2024-01-20', 'Ben', 'Ok'),
             (3, DATE '2024-02-02', 'Cy', 'Late'),
             (4, DATE '2024-01-21', 'Di', NULL)",
        )
        .await;
        let recorder = MemoryRecorder::default();
        let reviews = ReviewsConfig::default();
        let options = LoadOptions {
            request: WindowRequest::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap(),
            ..LoadOptions::default()
        };

        for id in ["a", "b"] {
            run_incremental_load(&connector, &recorder, request(&reviews, options, id))
                .await
                .unwrap();
        }

        assert_eq!(
            connector.query_scalar("SELECT count(*) FROM fct_reviews").await.unwrap(),
            2
        );
        assert_eq!(
            connector
                .query_scalar(
                    "SELECT count(*) FROM fct_reviews WHERE review_date NOT BETWEEN DATE '2024-01-01' AND DATE '2024-01-31'"
                )
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_table_in_other_schema_does_not_block_first_load() {
        let connector = seeded_connector("(42, DATE '2024-03-10', 'Alex', 'Great stay')").await;
        connector
            .execute("CREATE SCHEMA staging; CREATE TABLE staging.fct_reviews (x INTEGER);")
            .await
            .unwrap();
        let recorder = MemoryRecorder::default();
        let reviews = ReviewsConfig::default();

        let report = run_incremental_load(
            &connector,
            &recorder,
            request(&reviews, LoadOptions::default(), "run-1"),
        )
        .await
        .unwrap();
        assert!(report.was_full_load());
        assert_eq!(report.rows_appended, 1);
        assert_eq!(
            connector
                .query_scalar("SELECT count(*) FROM main.fct_reviews")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_full_history_rerun_skips_persisted_rows() {
        let connector = seeded_connector(
            "(1, DATE '2024-01-05', 'Ana', 'Nice'),
             (2, DATE '2024-02-20', 'Ben', 'Ok')",
        )
        .await;
        let recorder = MemoryRecorder::default();
        let reviews = ReviewsConfig::default();
        run_incremental_load(
            &connector,
            &recorder,
            request(&reviews, LoadOptions::default(), "a"),
        )
        .await
        .unwrap();

        // Late arrival, older than the high-water mark
        connector
            .execute("INSERT INTO raw_reviews VALUES (3, DATE '2024-01-10', 'Cy', 'Late')")
            .await
            .unwrap();
        let options = LoadOptions {
            default_window: crate::domain::review::DefaultWindow::FullHistory,
            ..LoadOptions::default()
        };
        let report = run_incremental_load(&connector, &recorder, request(&reviews, options, "b"))
            .await
            .unwrap();

        assert_eq!(report.rows_appended, 1);
        assert_eq!(report.skipped.already_persisted, 2);
        assert_eq!(
            connector.query_scalar("SELECT count(*) FROM fct_reviews").await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_propagated() {
        let recorder = MemoryRecorder::default();
        let reviews = ReviewsConfig::default();

        let result = run_incremental_load(
            &FailingStore,
            &recorder,
            request(&reviews, LoadOptions::default(), "run-x"),
        )
        .await;
        assert!(result.is_err());

        let entries = recorder.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, RunStatus::Failure);
        assert!(entries[0].message.as_deref().unwrap().contains("source offline"));
    }
}
