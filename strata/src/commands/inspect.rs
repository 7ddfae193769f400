// strata/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use comfy_table::Table;
use duckdb::{Connection, Row};
use std::path::Path;

use strata_core::infrastructure::config::database_path;
use strata_core::infrastructure::sql::{quote_ident, quote_literal};

use super::Project;

pub fn execute(project_dir: &Path, table: &str, limit: usize) -> anyhow::Result<bool> {
    let config = Project::load_config(project_dir)?;
    let db_path = database_path(project_dir, &config);

    if db_path != ":memory:" && !Path::new(&db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'strata run'?",
            db_path
        );
    }

    let conn = Connection::open(&db_path)?;

    println!("\n🔍 Inspecting Table: '{}'", table);

    // Fetch column names + types
    let mut stmt_cols = conn.prepare(&format!("PRAGMA table_info({})", quote_literal(table)))?;
    let columns: Vec<(String, String)> = stmt_cols
        .query_map([], |row: &Row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}' not found in {}", table, db_path);
    }

    let mut schema = Table::new();
    schema.set_header(vec!["column", "type"]);
    for (name, data_type) in &columns {
        schema.add_row(vec![name.clone(), data_type.clone()]);
    }
    println!("{}", schema);

    // Fetch sample rows, everything rendered as text by the engine
    let projection = columns
        .iter()
        .map(|(name, _)| format!("CAST({} AS VARCHAR)", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} LIMIT {}",
        projection,
        quote_ident(table),
        limit
    ))?;
    let mut rows = stmt.query([])?;

    let mut sample = Table::new();
    sample.set_header(columns.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>());
    while let Some(row) = rows.next()? {
        let values: Vec<String> = (0..columns.len())
            .map(|i| match row.get::<_, Option<String>>(i) {
                Ok(Some(val)) => val,
                Ok(None) => "NULL".to_string(),
                Err(_) => "ERROR".to_string(),
            })
            .collect();
        sample.add_row(values);
    }

    println!("   --- Rows (Limit {}) ---", limit);
    println!("{}", sample);
    Ok(true)
}
