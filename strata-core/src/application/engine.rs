// strata-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::error::StrataError;
use crate::ports::connector::Connector;

/// Ad-hoc SQL with timing, so slow statements show up in the logs.
#[instrument(skip(connector), fields(query.len = query.len(), engine = connector.engine_name()))]
pub async fn execute_query(connector: &dyn Connector, query: &str) -> Result<(), StrataError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    let result = connector.execute(query).await;
    let duration = start.elapsed();

    match result {
        Ok(_) => {
            debug!("✅ Query finished in {:.2?}", duration);
            Ok(())
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
