// strata-core/src/domain/review/record.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::surrogate_key::SurrogateKey;

/// A row as exposed by the raw review source, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub listing_id: i64,
    pub review_date: NaiveDate,
    pub reviewer_name: Option<String>,
    pub review_text: Option<String>,
    #[serde(default)]
    pub review_sentiment: Option<String>,
}

impl RawReview {
    /// Null and blank review texts never make it into the fact table.
    pub fn has_text(&self) -> bool {
        self.review_text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// One persisted row of the review fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFact {
    pub review_id: String,
    pub listing_id: i64,
    pub review_date: NaiveDate,
    pub reviewer_name: Option<String>,
    pub review_text: String,
    pub review_sentiment: Option<String>,
}

impl ReviewFact {
    /// Column order of the fact table. The DuckDB adapter and the schema
    /// contract check both rely on it.
    pub const COLUMNS: [&'static str; 6] = [
        "review_id",
        "listing_id",
        "review_date",
        "reviewer_name",
        "review_text",
        "review_sentiment",
    ];

    /// Builds the fact row, or `None` when the raw row has no usable text.
    pub fn from_raw(raw: RawReview) -> Option<Self> {
        if !raw.has_text() {
            return None;
        }
        let review_id = SurrogateKey::for_review(&raw);
        let review_text = raw.review_text?;

        Some(Self {
            review_id,
            listing_id: raw.listing_id,
            review_date: raw.review_date,
            reviewer_name: raw.reviewer_name,
            review_text,
            review_sentiment: raw.review_sentiment,
        })
    }
}
