// strata-core/src/domain/review/window.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What the loader does when the operator does not give both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultWindow {
    /// Only rows strictly newer than the persisted high-water mark, up to today.
    #[default]
    HighWaterMark,
    /// Everything up to today. Deduplication still prevents double inserts.
    FullHistory,
}

impl FromStr for DefaultWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "high_water_mark" | "hwm" => Ok(Self::HighWaterMark),
            "full_history" | "full" => Ok(Self::FullHistory),
            other => Err(DomainError::UnknownWindowPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for DefaultWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighWaterMark => write!(f, "high_water_mark"),
            Self::FullHistory => write!(f, "full_history"),
        }
    }
}

/// Bounds as requested by the operator, already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl WindowRequest {
    /// Parses `start_date` / `end_date`. Blank strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DomainError> {
        Ok(Self {
            start: parse_date("start_date", start)?,
            end: parse_date("end_date", end)?,
        })
    }

    /// Both bounds, if and only if both were supplied.
    pub fn explicit(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    /// Exactly one bound was supplied. Such a request falls back to the
    /// default policy.
    pub fn is_partial(&self) -> bool {
        self.start.is_some() != self.end.is_some()
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| DomainError::InvalidDate {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum LowerBound {
    Unbounded,
    Inclusive(NaiveDate),
    Exclusive(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOrigin {
    Explicit,
    HighWaterMark,
    FullHistory,
}

/// The date filter actually applied to a run. Upper bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWindow {
    pub lower: LowerBound,
    pub upper: NaiveDate,
    pub origin: WindowOrigin,
}

impl ResolvedWindow {
    pub fn resolve(
        request: &WindowRequest,
        policy: DefaultWindow,
        high_water_mark: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        if let Some((start, end)) = request.explicit() {
            return Self {
                lower: LowerBound::Inclusive(start),
                upper: end,
                origin: WindowOrigin::Explicit,
            };
        }

        match (policy, high_water_mark) {
            (DefaultWindow::HighWaterMark, Some(mark)) => Self {
                lower: LowerBound::Exclusive(mark),
                upper: today,
                origin: WindowOrigin::HighWaterMark,
            },
            // Nothing persisted yet: "the beginning of time".
            (DefaultWindow::HighWaterMark, None) => Self {
                lower: LowerBound::Unbounded,
                upper: today,
                origin: WindowOrigin::HighWaterMark,
            },
            (DefaultWindow::FullHistory, _) => Self {
                lower: LowerBound::Unbounded,
                upper: today,
                origin: WindowOrigin::FullHistory,
            },
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let above = match self.lower {
            LowerBound::Unbounded => true,
            LowerBound::Inclusive(start) => date >= start,
            LowerBound::Exclusive(mark) => date > mark,
        };
        above && date <= self.upper
    }

    /// No date can satisfy the window (ex: start_date > end_date).
    pub fn is_empty(&self) -> bool {
        match self.lower {
            LowerBound::Unbounded => false,
            LowerBound::Inclusive(start) => start > self.upper,
            LowerBound::Exclusive(mark) => mark >= self.upper,
        }
    }
}

impl fmt::Display for ResolvedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            LowerBound::Unbounded => write!(f, "(-inf, {}]", self.upper),
            LowerBound::Inclusive(start) => write!(f, "[{}, {}]", start, self.upper),
            LowerBound::Exclusive(mark) => write!(f, "({}, {}]", mark, self.upper),
        }
    }
}
