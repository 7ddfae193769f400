// strata-core/src/application/validation.rs

use std::collections::BTreeSet;
use std::path::Path;
use tracing::instrument;

// Imports Hexagonaux
use crate::domain::project::ProjectConfig;
use crate::domain::quality::{
    CheckKind, CheckOutcome, QualityReport, RowCountCheck, RowCountError,
};
use crate::domain::review::ReviewFact;
use crate::error::StrataError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::infrastructure::sql::quote_ident;
use crate::ports::connector::Connector;
use crate::ports::recorder::{AuditEntry, RunKind, RunRecorder, RunStatus};

pub const RESULTS_FILE: &str = "test_results.json";

/// Post-load checks on the fact table. Violations are reported in the
/// returned report; only warehouse/IO problems are errors.
#[instrument(skip_all, fields(fact_table = %config.reviews.fact_table))]
pub async fn run_tests(
    connector: &dyn Connector,
    config: &ProjectConfig,
    target_dir: &Path,
    recorder: &dyn RunRecorder,
    invocation_id: &str,
) -> Result<QualityReport, StrataError> {
    let fact_table = &config.reviews.fact_table;
    println!("    🧪 Running data tests for {}", fact_table);

    let report = collect_outcomes(connector, config).await?;

    for outcome in &report.outcomes {
        if outcome.passed() {
            println!("      ✅ PASS: {}", outcome.check);
        } else if outcome.is_blocking() {
            println!("      ❌ FAIL: {} ({})", outcome.check, outcome.message);
        } else {
            println!("      ⚠️  WARN: {} ({})", outcome.check, outcome.message);
        }
    }

    let content = serde_json::to_string_pretty(&report).map_err(InfrastructureError::JsonError)?;
    atomic_write(target_dir.join(RESULTS_FILE), content)?;

    let status = if report.success() {
        RunStatus::Success
    } else {
        RunStatus::Failure
    };
    let mut entry = AuditEntry::new(invocation_id, RunKind::Test, fact_table, status);
    entry.failed_checks = Some(report.failed().count() as u64);
    recorder.record(&entry)?;

    Ok(report)
}

async fn collect_outcomes(
    connector: &dyn Connector,
    config: &ProjectConfig,
) -> Result<QualityReport, StrataError> {
    let fact_table = &config.reviews.fact_table;
    let checks = &config.checks;
    let outcome = |check: CheckKind, failures: u64, message: String| {
        CheckOutcome::from_failures(check, checks.severity_for(check), failures, message)
    };

    // 0. Gate: nothing else makes sense without the table.
    if !connector.relation_exists(fact_table).await? {
        return Ok(QualityReport {
            relation: fact_table.clone(),
            outcomes: vec![outcome(
                CheckKind::FactTableExists,
                1,
                format!("Relation '{}' does not exist. Run `strata run` first.", fact_table),
            )],
        });
    }

    let fact = quote_ident(fact_table);
    let mut outcomes = vec![outcome(CheckKind::FactTableExists, 0, "present".into())];

    // 1. Schema contract
    let (drift, message) = schema_drift(connector, fact_table).await?;
    outcomes.push(outcome(CheckKind::SchemaContract, drift, message));

    // 2. Surrogate key
    let nulls = connector
        .query_scalar(&format!("SELECT count(*) FROM {} WHERE review_id IS NULL", fact))
        .await?;
    outcomes.push(outcome(
        CheckKind::ReviewIdNotNull,
        nulls,
        format!("{} rows with a NULL review_id", nulls),
    ));

    let duplicates = connector
        .query_scalar(&format!(
            "SELECT count(*) FROM (SELECT review_id FROM {} WHERE review_id IS NOT NULL GROUP BY review_id HAVING count(*) > 1)",
            fact
        ))
        .await?;
    outcomes.push(outcome(
        CheckKind::ReviewIdUnique,
        duplicates,
        format!("{} review_id values appear more than once", duplicates),
    ));

    // 3. Listing relationship + chronology
    let total = connector
        .query_scalar(&format!("SELECT count(*) FROM {}", fact))
        .await?;
    let listings = &config.listings;

    if connector.relation_exists(&listings.relation).await? {
        let dim = quote_ident(&listings.relation);
        let dim_id = quote_ident(&listings.columns.listing_id);
        let created_at = quote_ident(&listings.columns.created_at);

        let dangling = connector
            .query_scalar(&format!(
                "SELECT count(*) FROM {fact} f LEFT JOIN {dim} l ON f.listing_id = l.{dim_id} \
                 WHERE f.listing_id IS NOT NULL AND l.{dim_id} IS NULL"
            ))
            .await?;
        outcomes.push(outcome(
            CheckKind::ListingRelationship,
            dangling,
            format!("{} rows reference a listing missing from '{}'", dangling, listings.relation),
        ));

        let premature = connector
            .query_scalar(&format!(
                "SELECT count(*) FROM {fact} f JOIN {dim} l ON f.listing_id = l.{dim_id} \
                 WHERE f.review_date < CAST(l.{created_at} AS DATE)"
            ))
            .await?;
        outcomes.push(outcome(
            CheckKind::ReviewAfterListingCreated,
            premature,
            format!("{} reviews are dated before their listing was created", premature),
        ));
    } else {
        let message = format!("Listing relation '{}' does not exist", listings.relation);
        outcomes.push(outcome(CheckKind::ListingRelationship, total.max(1), message.clone()));
        outcomes.push(outcome(CheckKind::ReviewAfterListingCreated, total.max(1), message));
    }

    // 4. Volume
    let (missing, message) = match RowCountCheck::validate(total, checks.min_row_count) {
        Ok(()) => (0, format!("{} rows (minimum {})", total, checks.min_row_count)),
        Err(e @ RowCountError::BelowMinimum { missing, .. }) => (missing, e.to_string()),
    };
    outcomes.push(outcome(CheckKind::MinRowCount, missing, message));

    Ok(QualityReport {
        relation: fact_table.clone(),
        outcomes,
    })
}

async fn schema_drift(
    connector: &dyn Connector,
    fact_table: &str,
) -> Result<(u64, String), StrataError> {
    let actual: BTreeSet<String> = connector
        .fetch_columns(fact_table)
        .await?
        .into_iter()
        .map(|c| c.name.to_lowercase())
        .collect();
    let expected: BTreeSet<String> = ReviewFact::COLUMNS.iter().map(|c| c.to_string()).collect();

    let missing: Vec<_> = expected.difference(&actual).cloned().collect();
    let undocumented: Vec<_> = actual.difference(&expected).cloned().collect();
    let drift = (missing.len() + undocumented.len()) as u64;

    let message = if drift == 0 {
        "columns match".to_string()
    } else {
        format!("missing: {:?}, undocumented: {:?}", missing, undocumented)
    };
    Ok((drift, message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::{CheckStatus, Severity};
    use crate::infrastructure::adapters::duckdb::DuckDBConnector;
    use crate::infrastructure::config::project::parse_project_config;
    use crate::infrastructure::recorder::JsonlAuditLog;
    use anyhow::Result;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
name: airbnb
version: "1.0.0"
checks:
  min-row-count: 2
"#;

    async fn warehouse(facts: &str) -> DuckDBConnector {
        let connector = DuckDBConnector::new(":memory:").unwrap();
        connector
            .execute(&format!(
                "CREATE TABLE dim_listings (listing_id BIGINT, created_at TIMESTAMP);
                 INSERT INTO dim_listings VALUES (42, TIMESTAMP '2024-01-01 10:00:00'), (43, TIMESTAMP '2024-03-01 00:00:00');
                 CREATE TABLE fct_reviews (review_id VARCHAR, listing_id BIGINT, review_date DATE, reviewer_name VARCHAR, review_text VARCHAR, review_sentiment VARCHAR);
                 INSERT INTO fct_reviews VALUES {};",
                facts
            ))
            .await
            .unwrap();
        connector
    }

    async fn check(connector: &DuckDBConnector, config: &ProjectConfig) -> Result<QualityReport> {
        let dir = tempdir()?;
        let recorder = JsonlAuditLog::in_target_dir(dir.path());
        let report = run_tests(connector, config, dir.path(), &recorder, "test-run").await?;
        assert!(dir.path().join(RESULTS_FILE).exists());
        Ok(report)
    }

    fn status(report: &QualityReport, kind: CheckKind) -> CheckStatus {
        report.get(kind).unwrap().status
    }

    #[tokio::test]
    async fn test_clean_table_passes() -> Result<()> {
        let connector = warehouse(
            "('a', 42, DATE '2024-01-01', 'Alex', 'Great', NULL),
             ('b', 43, DATE '2024-03-05', 'Sam', 'Fine', NULL)",
        )
        .await;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        assert!(report.success(), "{:?}", report);
        assert_eq!(report.failed().count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_review_before_listing_creation_is_flagged() -> Result<()> {
        let connector = warehouse(
            "('a', 42, DATE '2024-01-01', 'Alex', 'Great', NULL),
             ('b', 43, DATE '2024-02-28', 'Sam', 'Too early', NULL)",
        )
        .await;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        assert!(!report.success());
        let outcome = report.get(CheckKind::ReviewAfterListingCreated).unwrap();
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(outcome.failures, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_listing_and_duplicates() -> Result<()> {
        let connector = warehouse(
            "('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL),
             ('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL),
             ('c', 99, DATE '2024-01-03', 'Kim', 'Where?', NULL),
             (NULL, 42, DATE '2024-01-04', 'Lou', 'Hmm', NULL)",
        )
        .await;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        assert_eq!(status(&report, CheckKind::ListingRelationship), CheckStatus::Fail);
        assert_eq!(report.get(CheckKind::ReviewIdUnique).unwrap().failures, 1);
        assert_eq!(report.get(CheckKind::ReviewIdNotNull).unwrap().failures, 1);
        assert_eq!(status(&report, CheckKind::SchemaContract), CheckStatus::Pass);
        Ok(())
    }

    #[tokio::test]
    async fn test_row_count_below_threshold() -> Result<()> {
        let connector = warehouse("('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL)").await;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        let outcome = report.get(CheckKind::MinRowCount).unwrap();
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(outcome.failures, 1);
        assert!(!report.success());
        Ok(())
    }

    #[tokio::test]
    async fn test_warn_severity_does_not_fail_report() -> Result<()> {
        let connector = warehouse("('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL)").await;
        let mut config = parse_project_config(CONFIG)?;
        config.checks.severity.insert(CheckKind::MinRowCount, Severity::Warn);

        let report = check(&connector, &config).await?;
        assert_eq!(status(&report, CheckKind::MinRowCount), CheckStatus::Fail);
        assert!(report.success());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fact_table() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(status(&report, CheckKind::FactTableExists), CheckStatus::Fail);
        assert!(!report.success());
        Ok(())
    }

    #[tokio::test]
    async fn test_relations_in_other_schema_are_not_used() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute(
                "CREATE SCHEMA staging;
                 CREATE TABLE staging.fct_reviews (x INTEGER);
                 CREATE TABLE staging.dim_listings (listing_id BIGINT, created_at TIMESTAMP);",
            )
            .await?;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(status(&report, CheckKind::FactTableExists), CheckStatus::Fail);

        connector
            .execute(
                "CREATE TABLE fct_reviews (review_id VARCHAR, listing_id BIGINT, review_date DATE, reviewer_name VARCHAR, review_text VARCHAR, review_sentiment VARCHAR);
                 INSERT INTO fct_reviews VALUES ('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL);",
            )
            .await?;
        let report = check(&connector, &config).await?;
        let outcome = report.get(CheckKind::ListingRelationship).unwrap();
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert!(outcome.message.contains("does not exist"));
        Ok(())
    }

    #[tokio::test]
    async fn test_schema_drift_is_reported() -> Result<()> {
        let connector = warehouse("('a', 42, DATE '2024-01-02', 'Alex', 'Great', NULL)").await;
        connector
            .execute("ALTER TABLE fct_reviews ADD COLUMN host_email VARCHAR")
            .await?;
        let config = parse_project_config(CONFIG)?;

        let report = check(&connector, &config).await?;
        let outcome = report.get(CheckKind::SchemaContract).unwrap();
        assert_eq!(outcome.failures, 1);
        assert!(outcome.message.contains("host_email"));
        Ok(())
    }
}
