// strata-core/src/domain/quality/check.rs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Error,
    Warn,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
        }
    }
}

/// Checks run against the review fact table after a load.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    FactTableExists,
    SchemaContract,
    ReviewIdNotNull,
    ReviewIdUnique,
    ListingRelationship,
    ReviewAfterListingCreated,
    MinRowCount,
}

impl CheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FactTableExists => "fact_table_exists",
            Self::SchemaContract => "schema_contract",
            Self::ReviewIdNotNull => "review_id_not_null",
            Self::ReviewIdUnique => "review_id_unique",
            Self::ListingRelationship => "listing_relationship",
            Self::ReviewAfterListingCreated => "review_after_listing_created",
            Self::MinRowCount => "min_row_count",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckOutcome {
    pub check: CheckKind,
    pub severity: Severity,
    pub status: CheckStatus,
    /// Offending rows (or, for `min_row_count`, the missing rows).
    pub failures: u64,
    pub message: String,
}

impl CheckOutcome {
    pub fn from_failures(
        check: CheckKind,
        severity: Severity,
        failures: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check,
            severity,
            status: if failures == 0 {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            },
            failures,
            message: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }

    /// A failed check that should make the run fail.
    pub fn is_blocking(&self) -> bool {
        !self.passed() && self.severity == Severity::Error
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QualityReport {
    pub relation: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl QualityReport {
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(CheckOutcome::is_blocking)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn get(&self, check: CheckKind) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_success_ignores_warnings() {
        let report = QualityReport {
            relation: "fct_reviews".into(),
            outcomes: vec![
                CheckOutcome::from_failures(CheckKind::ReviewIdUnique, Severity::Error, 0, "ok"),
                CheckOutcome::from_failures(CheckKind::MinRowCount, Severity::Warn, 3, "short"),
            ],
        };
        assert!(report.success());
        assert_eq!(report.failed().count(), 1);
    }

    #[test]
    fn test_report_fails_on_error_severity() {
        let report = QualityReport {
            relation: "fct_reviews".into(),
            outcomes: vec![CheckOutcome::from_failures(
                CheckKind::ListingRelationship,
                Severity::Error,
                1,
                "dangling",
            )],
        };
        assert!(!report.success());
        assert!(report.get(CheckKind::ListingRelationship).is_some_and(|o| o.is_blocking()));
    }
}
