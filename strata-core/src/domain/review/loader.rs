// strata-core/src/domain/review/loader.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::record::{RawReview, ReviewFact};
use super::window::{DefaultWindow, ResolvedWindow, WindowRequest};

/// Whether the fact table exists yet. The only state the loader branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderState {
    Uninitialized,
    Initialized,
}

/// What the warehouse currently holds for the fact table.
#[derive(Debug, Clone)]
pub struct FactSnapshot {
    pub state: LoaderState,
    pub high_water_mark: Option<NaiveDate>,
    /// Persisted keys that a batch can collide with. The key covers
    /// `review_date`, so keys dated outside the load window are never needed.
    pub existing_ids: HashSet<String>,
}

impl FactSnapshot {
    pub fn uninitialized() -> Self {
        Self {
            state: LoaderState::Uninitialized,
            high_water_mark: None,
            existing_ids: HashSet::new(),
        }
    }
}

/// Why raw rows were not appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub missing_text: u64,
    pub outside_window: u64,
    pub already_persisted: u64,
    pub duplicate_in_batch: u64,
}

impl SkipCounts {
    pub fn total(&self) -> u64 {
        self.missing_text + self.outside_window + self.already_persisted + self.duplicate_in_batch
    }
}

/// Outcome of planning a load: the rows to append and how we got there.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub state: LoaderState,
    pub window: ResolvedWindow,
    pub scanned: u64,
    pub rows: Vec<ReviewFact>,
    pub skipped: SkipCounts,
}

impl LoadPlan {
    /// On an uninitialized table the append is a full load.
    pub fn is_full_load(&self) -> bool {
        self.state == LoaderState::Uninitialized
    }
}

/// Operator-facing knobs of the loader, already typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub request: WindowRequest,
    pub default_window: DefaultWindow,
}

impl LoadOptions {
    pub fn window(&self, high_water_mark: Option<NaiveDate>, today: NaiveDate) -> ResolvedWindow {
        ResolvedWindow::resolve(&self.request, self.default_window, high_water_mark, today)
    }
}

pub struct IncrementalLoader;

impl IncrementalLoader {
    /// Filter, hash and deduplicate raw rows against the persisted snapshot.
    ///
    /// Pure: no I/O, no clock, no logging. `today` is the inclusive upper
    /// bound of the default window.
    pub fn plan<I>(
        raw_rows: I,
        snapshot: &FactSnapshot,
        options: &LoadOptions,
        today: NaiveDate,
    ) -> LoadPlan
    where
        I: IntoIterator<Item = RawReview>,
    {
        let window = options.window(snapshot.high_water_mark, today);

        let mut skipped = SkipCounts::default();
        let mut scanned = 0_u64;
        let mut seen: HashSet<String> = HashSet::new();
        let mut rows = Vec::new();

        for raw in raw_rows {
            scanned += 1;

            // 1. Text filter
            if !raw.has_text() {
                skipped.missing_text += 1;
                continue;
            }

            // 2. Date window
            if !window.contains(raw.review_date) {
                skipped.outside_window += 1;
                continue;
            }

            // 3. Surrogate key
            let Some(fact) = ReviewFact::from_raw(raw) else {
                skipped.missing_text += 1;
                continue;
            };

            // 4. Dedup (persisted first, then within the batch)
            if snapshot.existing_ids.contains(&fact.review_id) {
                skipped.already_persisted += 1;
                continue;
            }
            if !seen.insert(fact.review_id.clone()) {
                skipped.duplicate_in_batch += 1;
                continue;
            }

            rows.push(fact);
        }

        LoadPlan {
            state: snapshot.state,
            window,
            scanned,
            rows,
            skipped,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn raw(listing_id: i64, date: NaiveDate, name: &str, text: Option<&str>) -> RawReview {
        RawReview {
            listing_id,
            review_date: date,
            reviewer_name: Some(name.to_string()),
            review_text: text.map(str::to_string),
            review_sentiment: None,
        }
    }

    fn persisted(plan: &LoadPlan) -> FactSnapshot {
        FactSnapshot {
            state: LoaderState::Initialized,
            high_water_mark: plan.rows.iter().map(|r| r.review_date).max(),
            existing_ids: plan.rows.iter().map(|r| r.review_id.clone()).collect(),
        }
    }

    fn explicit(start: &str, end: &str) -> LoadOptions {
        LoadOptions {
            request: WindowRequest::parse(Some(start), Some(end)).unwrap(),
            default_window: DefaultWindow::HighWaterMark,
        }
    }

    #[test]
    fn test_first_run_then_rerun_appends_nothing() {
        let today = d(2024, 4, 1);
        let input = vec![raw(42, d(2024, 3, 10), "Alex", Some("Great stay"))];

        let first = IncrementalLoader::plan(
            input.clone(),
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            today,
        );
        assert!(first.is_full_load());
        assert_eq!(first.rows.len(), 1);
        assert!(!first.rows[0].review_id.is_empty());

        let second =
            IncrementalLoader::plan(input, &persisted(&first), &LoadOptions::default(), today);
        assert!(!second.is_full_load());
        assert!(second.rows.is_empty());
        assert_eq!(second.skipped.outside_window, 1);
    }

    #[test]
    fn test_rerun_over_same_explicit_window_is_idempotent() {
        let today = d(2024, 12, 31);
        let input = vec![
            raw(1, d(2024, 1, 5), "Ana", Some("Nice")),
            raw(2, d(2024, 1, 20), "Ben", Some("Ok")),
        ];
        let options = explicit("2024-01-01", "2024-01-31");

        let first =
            IncrementalLoader::plan(input.clone(), &FactSnapshot::uninitialized(), &options, today);
        assert_eq!(first.rows.len(), 2);

        let second = IncrementalLoader::plan(input, &persisted(&first), &options, today);
        assert!(second.rows.is_empty());
        assert_eq!(second.skipped.already_persisted, 2);
    }

    #[test]
    fn test_missing_and_blank_text_are_dropped() {
        let input = vec![
            raw(1, d(2024, 1, 5), "Ana", None),
            raw(1, d(2024, 1, 6), "Ana", Some("")),
            raw(1, d(2024, 1, 7), "Ana", Some("  ")),
            raw(1, d(2024, 1, 8), "Ana", Some("Fine")),
        ];
        let plan = IncrementalLoader::plan(
            input,
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            d(2024, 2, 1),
        );
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.skipped.missing_text, 3);
        assert!(plan.rows.iter().all(|r| !r.review_text.trim().is_empty()));
    }

    #[test]
    fn test_explicit_window_bounds_every_row() {
        let input = vec![
            raw(1, d(2023, 12, 31), "A", Some("x")),
            raw(1, d(2024, 1, 1), "B", Some("x")),
            raw(1, d(2024, 1, 31), "C", Some("x")),
            raw(1, d(2024, 2, 1), "D", Some("x")),
        ];
        let plan = IncrementalLoader::plan(
            input,
            &FactSnapshot::uninitialized(),
            &explicit("2024-01-01", "2024-01-31"),
            d(2025, 1, 1),
        );
        assert_eq!(plan.rows.len(), 2);
        assert_eq!(plan.skipped.outside_window, 2);
        assert!(
            plan.rows
                .iter()
                .all(|r| r.review_date >= d(2024, 1, 1) && r.review_date <= d(2024, 1, 31))
        );
    }

    #[test]
    fn test_inverted_window_loads_nothing() {
        let input = vec![raw(1, d(2024, 1, 15), "A", Some("x"))];
        let plan = IncrementalLoader::plan(
            input,
            &FactSnapshot::uninitialized(),
            &explicit("2024-02-01", "2024-01-01"),
            d(2025, 1, 1),
        );
        assert!(plan.window.is_empty());
        assert!(plan.rows.is_empty());
    }

    #[test]
    fn test_identical_tuples_collapse_within_batch() {
        let mut twin = raw(5, d(2024, 1, 2), "Eve", Some("Same"));
        twin.review_sentiment = Some("neutral".into());
        let input = vec![raw(5, d(2024, 1, 2), "Eve", Some("Same")), twin];

        let plan = IncrementalLoader::plan(
            input,
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            d(2024, 2, 1),
        );
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.skipped.duplicate_in_batch, 1);
        assert_eq!(plan.rows[0].review_sentiment, None);
    }

    #[test]
    fn test_default_window_caps_at_today() {
        let input = vec![
            raw(1, d(2024, 1, 1), "A", Some("x")),
            raw(1, d(2024, 5, 1), "B", Some("x")),
        ];
        let plan = IncrementalLoader::plan(
            input,
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            d(2024, 3, 1),
        );
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.rows[0].review_date, d(2024, 1, 1));
    }

    #[test]
    fn test_full_history_policy_still_dedups() {
        let today = d(2024, 6, 1);
        let input = vec![
            raw(1, d(2024, 1, 1), "A", Some("x")),
            raw(2, d(2024, 2, 1), "B", Some("y")),
        ];
        let first = IncrementalLoader::plan(
            input.clone(),
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            today,
        );

        // A late-arriving row older than the high-water mark.
        let mut late = input;
        late.push(raw(3, d(2024, 1, 15), "C", Some("z")));

        let options = LoadOptions {
            default_window: DefaultWindow::FullHistory,
            ..LoadOptions::default()
        };
        let second = IncrementalLoader::plan(late, &persisted(&first), &options, today);
        assert_eq!(second.rows.len(), 1);
        assert_eq!(second.rows[0].listing_id, 3);
        assert_eq!(second.skipped.already_persisted, 2);
    }

    #[test]
    fn test_keys_do_not_depend_on_input_order() {
        let a = raw(1, d(2024, 1, 1), "A", Some("x"));
        let b = raw(2, d(2024, 1, 2), "B", Some("y"));
        let today = d(2024, 2, 1);

        let forward = IncrementalLoader::plan(
            vec![a.clone(), b.clone()],
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            today,
        );
        let backward = IncrementalLoader::plan(
            vec![b, a],
            &FactSnapshot::uninitialized(),
            &LoadOptions::default(),
            today,
        );

        let mut left: Vec<_> = forward.rows.iter().map(|r| r.review_id.clone()).collect();
        let mut right: Vec<_> = backward.rows.iter().map(|r| r.review_id.clone()).collect();
        left.sort();
        right.sort();
        assert_eq!(left, right);
    }
}
