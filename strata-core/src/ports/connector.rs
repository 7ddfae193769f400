// strata-core/src/ports/connector.rs

// What the application needs from a SQL warehouse, without knowing which
// engine answers. The DuckDB adapter is the only implementation today.

use crate::error::StrataError;
use async_trait::async_trait;

// Struct simple pour décrire une colonne (indépendant de la DB)
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), StrataError>;

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, StrataError>;

    /// Expose a CSV file as a relation (ex: read_csv_auto).
    async fn register_source(&self, name: &str, path: &str) -> Result<(), StrataError>;

    /// First column of the first row, as a non-negative integer (ex: COUNT(*)).
    async fn query_scalar(&self, query: &str) -> Result<u64, StrataError>;

    async fn relation_exists(&self, name: &str) -> Result<bool, StrataError>;

    fn engine_name(&self) -> &str;
}
