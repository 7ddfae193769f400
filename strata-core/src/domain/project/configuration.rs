// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::quality::{CheckKind, Severity};
use crate::domain::review::{DefaultWindow, LoadOptions, WindowRequest};

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1))]
    pub name: String,
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,

    /// DuckDB file, relative to the project directory (or ":memory:").
    #[serde(default = "default_database")]
    #[validate(length(min = 1))]
    pub database: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub sources: Vec<SourceDefinition>,

    #[serde(default)]
    #[validate(nested)]
    pub reviews: ReviewsConfig,

    #[serde(default)]
    #[validate(nested)]
    pub listings: ListingsConfig,

    #[serde(default)]
    #[validate(nested)]
    pub checks: ChecksConfig,
}

impl ProjectConfig {
    /// Cross-field rules on relation names. Warehouse identifiers are
    /// case-insensitive, so names are compared that way.
    pub fn check_relations(&self) -> Result<(), DomainError> {
        let fact = self.reviews.fact_table.as_str();
        let same = |a: &str, b: &str| a.eq_ignore_ascii_case(b);

        if same(fact, &self.reviews.source) {
            return Err(DomainError::InvalidConfiguration(format!(
                "reviews.fact-table '{}' is also the raw review source",
                fact
            )));
        }
        if same(fact, &self.listings.relation) {
            return Err(DomainError::InvalidConfiguration(format!(
                "reviews.fact-table '{}' is also the listing relation",
                fact
            )));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if same(&source.name, fact) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "source '{}' has the same name as the fact table",
                    source.name
                )));
            }
            if !seen.insert(source.name.to_lowercase()) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "source '{}' is declared more than once",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

/// A raw CSV file exposed to the warehouse as a view.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SourceDefinition {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct ReviewsConfig {
    /// Relation holding the raw reviews.
    #[serde(default = "default_review_source")]
    #[validate(length(min = 1))]
    pub source: String,

    #[serde(default = "default_fact_table")]
    #[validate(length(min = 1))]
    pub fact_table: String,

    // Kept as text: parsing happens in `load_options` so a typo surfaces
    // as a date error rather than a YAML one.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default)]
    pub default_window: DefaultWindow,

    #[serde(default)]
    #[validate(nested)]
    pub columns: ReviewColumns,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            source: default_review_source(),
            fact_table: default_fact_table(),
            start_date: None,
            end_date: None,
            default_window: DefaultWindow::default(),
            columns: ReviewColumns::default(),
        }
    }
}

impl ReviewsConfig {
    pub fn load_options(&self) -> Result<LoadOptions, DomainError> {
        let request = WindowRequest::parse(self.start_date.as_deref(), self.end_date.as_deref())?;
        Ok(LoadOptions {
            request,
            default_window: self.default_window,
        })
    }
}

/// Column names of the raw review relation.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ReviewColumns {
    #[serde(default = "col_listing_id")]
    #[validate(length(min = 1))]
    pub listing_id: String,
    #[serde(default = "col_review_date")]
    #[validate(length(min = 1))]
    pub review_date: String,
    #[serde(default = "col_reviewer_name")]
    #[validate(length(min = 1))]
    pub reviewer_name: String,
    #[serde(default = "col_review_text")]
    #[validate(length(min = 1))]
    pub review_text: String,
    /// Optional pass-through attribute; not read when absent.
    #[serde(default)]
    pub review_sentiment: Option<String>,
}

impl Default for ReviewColumns {
    fn default() -> Self {
        Self {
            listing_id: col_listing_id(),
            review_date: col_review_date(),
            reviewer_name: col_reviewer_name(),
            review_text: col_review_text(),
            review_sentiment: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ListingsConfig {
    #[serde(default = "default_listings_relation")]
    #[validate(length(min = 1))]
    pub relation: String,
    #[serde(default)]
    #[validate(nested)]
    pub columns: ListingColumns,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            relation: default_listings_relation(),
            columns: ListingColumns::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ListingColumns {
    #[serde(default = "col_listing_id")]
    #[validate(length(min = 1))]
    pub listing_id: String,
    #[serde(default = "col_created_at")]
    #[validate(length(min = 1))]
    pub created_at: String,
}

impl Default for ListingColumns {
    fn default() -> Self {
        Self {
            listing_id: col_listing_id(),
            created_at: col_created_at(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct ChecksConfig {
    /// A table with fewer rows fails `min_row_count`. Zero would make the
    /// check vacuous; downgrade its severity to `warn` instead.
    #[serde(default = "default_min_row_count")]
    #[validate(range(min = 1))]
    pub min_row_count: u64,

    /// Per-check severity override (default: error).
    #[serde(default)]
    pub severity: HashMap<CheckKind, Severity>,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            min_row_count: default_min_row_count(),
            severity: HashMap::new(),
        }
    }
}

impl ChecksConfig {
    pub fn severity_for(&self, check: CheckKind) -> Severity {
        self.severity.get(&check).copied().unwrap_or_default()
    }
}

fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_database() -> String {
    "target/strata.duckdb".to_string()
}
fn default_review_source() -> String {
    "raw_reviews".to_string()
}
fn default_fact_table() -> String {
    "fct_reviews".to_string()
}
fn default_listings_relation() -> String {
    "dim_listings".to_string()
}
fn default_min_row_count() -> u64 {
    1
}
fn col_listing_id() -> String {
    "listing_id".to_string()
}
fn col_review_date() -> String {
    "review_date".to_string()
}
fn col_reviewer_name() -> String {
    "reviewer_name".to_string()
}
fn col_review_text() -> String {
    "review_text".to_string()
}
fn col_created_at() -> String {
    "created_at".to_string()
}
