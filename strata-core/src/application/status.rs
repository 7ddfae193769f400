// strata-core/src/application/status.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::review::LoaderState;
use crate::error::StrataError;
use crate::infrastructure::sql::quote_ident;
use crate::ports::connector::Connector;
use crate::ports::review_store::ReviewStore;

#[derive(Debug, Serialize)]
pub struct LoaderStatus {
    pub relation: String,
    pub state: LoaderState,
    pub high_water_mark: Option<NaiveDate>,
    pub row_count: u64,
}

pub async fn loader_status(
    store: &dyn ReviewStore,
    connector: &dyn Connector,
    fact_table: &str,
) -> Result<LoaderStatus, StrataError> {
    let snapshot = store.fact_snapshot(fact_table).await?;

    let row_count = match snapshot.state {
        LoaderState::Uninitialized => 0,
        LoaderState::Initialized => {
            connector
                .query_scalar(&format!("SELECT count(*) FROM {}", quote_ident(fact_table)))
                .await?
        }
    };

    Ok(LoaderStatus {
        relation: fact_table.to_string(),
        state: snapshot.state,
        high_water_mark: snapshot.high_water_mark,
        row_count,
    })
}
