// strata-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use duckdb::{Config, Connection, params, params_from_iter};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// Imports Hexagonaux
use crate::domain::project::ReviewColumns;
use crate::domain::review::{
    FactSnapshot, LoaderState, LowerBound, RawReview, ResolvedWindow, ReviewFact,
};
use crate::error::StrataError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::infrastructure::fs::ensure_parent_dir;
use crate::infrastructure::sql::{quote_ident, quote_literal, split_qualified};
use crate::ports::connector::{ColumnSchema, Connector};
use crate::ports::review_store::ReviewStore;

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            ensure_parent_dir(Path::new(db_path))?;
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StrataError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

/// Resolves `name` the way a bare `FROM name` would: unqualified parts
/// default to the current catalog and schema.
fn table_exists(conn: &Connection, name: &str) -> Result<bool, StrataError> {
    let (catalog, schema, table) = split_qualified(name);
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM information_schema.tables
         WHERE table_name = ?
           AND table_schema = coalesce(CAST(? AS VARCHAR), current_schema())
           AND table_catalog = coalesce(CAST(? AS VARCHAR), current_database())",
        params![table, schema, catalog],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, StrataError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        InfrastructureError::Database(DatabaseError::Decode {
            column: column.to_string(),
            value: value.to_string(),
        })
        .into()
    })
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fact_table_ddl(fact_table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            review_id VARCHAR,
            listing_id BIGINT,
            review_date DATE,
            reviewer_name VARCHAR,
            review_text VARCHAR,
            review_sentiment VARCHAR
        )",
        quote_ident(fact_table)
    )
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), StrataError> {
        let conn = self.lock()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, StrataError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "PRAGMA table_info({})",
            quote_literal(table_name)
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }

        Ok(columns)
    }

    async fn register_source(&self, name: &str, path: &str) -> Result<(), StrataError> {
        let query = format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM read_csv_auto({})",
            quote_ident(name),
            quote_literal(path)
        );
        self.execute(&query).await
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, StrataError> {
        let conn = self.lock()?;
        let value: Option<i64> = conn.query_row(query, [], |row| row.get(0))?;

        u64::try_from(value.unwrap_or(0)).map_err(|_| {
            InfrastructureError::Database(DatabaseError::Decode {
                column: "scalar".into(),
                value: format!("{:?}", value),
            })
            .into()
        })
    }

    async fn relation_exists(&self, name: &str) -> Result<bool, StrataError> {
        let conn = self.lock()?;
        table_exists(&conn, name)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[async_trait]
impl ReviewStore for DuckDBConnector {
    async fn fact_snapshot(&self, fact_table: &str) -> Result<FactSnapshot, StrataError> {
        let conn = self.lock()?;

        if !table_exists(&conn, fact_table)? {
            debug!(table = fact_table, "Fact table not found, loader is uninitialized");
            return Ok(FactSnapshot::uninitialized());
        }

        let table = quote_ident(fact_table);

        let mark: Option<String> = conn.query_row(
            &format!("SELECT CAST(max(review_date) AS VARCHAR) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        let high_water_mark = match mark {
            Some(value) => Some(parse_date("review_date", &value)?),
            None => None,
        };

        Ok(FactSnapshot {
            state: LoaderState::Initialized,
            high_water_mark,
            existing_ids: HashSet::new(),
        })
    }

    async fn persisted_ids(
        &self,
        fact_table: &str,
        window: &ResolvedWindow,
    ) -> Result<HashSet<String>, StrataError> {
        let conn = self.lock()?;

        if window.is_empty() || !table_exists(&conn, fact_table)? {
            return Ok(HashSet::new());
        }

        let mut bounds = Vec::with_capacity(2);
        let lower = match window.lower {
            LowerBound::Unbounded => "",
            LowerBound::Inclusive(start) => {
                bounds.push(iso(start));
                "review_date >= CAST(? AS DATE) AND "
            }
            LowerBound::Exclusive(mark) => {
                bounds.push(iso(mark));
                "review_date > CAST(? AS DATE) AND "
            }
        };
        bounds.push(iso(window.upper));

        let query = format!(
            "SELECT review_id FROM {} WHERE review_id IS NOT NULL AND {}review_date <= CAST(? AS DATE)",
            quote_ident(fact_table),
            lower
        );
        debug!(%window, "⚡ Reading persisted keys: {}", query);

        let mut stmt = conn.prepare(&query)?;
        let ids = stmt
            .query_map(params_from_iter(bounds.iter()), |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids)
    }

    async fn fetch_raw_reviews(
        &self,
        source: &str,
        columns: &ReviewColumns,
    ) -> Result<Vec<RawReview>, StrataError> {
        let sentiment = columns
            .review_sentiment
            .as_deref()
            .map(|c| format!("CAST({} AS VARCHAR)", quote_ident(c)))
            .unwrap_or_else(|| "CAST(NULL AS VARCHAR)".to_string());

        let query = format!(
            "SELECT CAST({} AS BIGINT), CAST(CAST({} AS DATE) AS VARCHAR), CAST({} AS VARCHAR), CAST({} AS VARCHAR), {} FROM {}",
            quote_ident(&columns.listing_id),
            quote_ident(&columns.review_date),
            quote_ident(&columns.reviewer_name),
            quote_ident(&columns.review_text),
            sentiment,
            quote_ident(source)
        );
        debug!("⚡ Reading raw reviews: {}", query);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&query)?;
        let mut rows = stmt.query([])?;

        let mut reviews = Vec::new();
        let mut unkeyed = 0_u64;
        while let Some(row) = rows.next()? {
            let listing_id: Option<i64> = row.get(0)?;
            let review_date: Option<String> = row.get(1)?;

            // Without a listing or a date a row can't be keyed nor windowed.
            let (Some(listing_id), Some(review_date)) = (listing_id, review_date) else {
                unkeyed += 1;
                continue;
            };

            reviews.push(RawReview {
                listing_id,
                review_date: parse_date(&columns.review_date, &review_date)?,
                reviewer_name: row.get(2)?,
                review_text: row.get(3)?,
                review_sentiment: row.get(4)?,
            });
        }

        if unkeyed > 0 {
            warn!(
                source,
                rows = unkeyed,
                "Skipped raw reviews with a NULL listing id or review date"
            );
        }

        Ok(reviews)
    }

    async fn append_reviews(
        &self,
        fact_table: &str,
        rows: &[ReviewFact],
    ) -> Result<u64, StrataError> {
        let mut conn = self.lock()?;

        // DDL + inserts share one transaction: readers see all of the batch or none.
        let tx = conn.transaction()?;
        tx.execute_batch(&fact_table_ddl(fact_table))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES (?, ?, CAST(? AS DATE), ?, ?, ?)",
                quote_ident(fact_table),
                ReviewFact::COLUMNS.join(", ")
            ))?;

            for row in rows {
                let review_date = iso(row.review_date);
                stmt.execute(params![
                    row.review_id,
                    row.listing_id,
                    review_date,
                    row.reviewer_name,
                    row.review_text,
                    row.review_sentiment
                ])?;
            }
        }
        tx.commit()?;

        Ok(rows.len() as u64)
    }
}
