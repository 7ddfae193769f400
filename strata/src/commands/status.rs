// strata/src/commands/status.rs
//
// USE CASE: Where is the loader at?

use comfy_table::Table;
use std::path::Path;

use strata_core::application::loader_status;

use super::Project;

pub async fn execute(project_dir: &Path) -> anyhow::Result<bool> {
    let config = Project::load_config(project_dir)?;
    let project = Project::open(project_dir, config)?;

    let status = loader_status(
        &project.connector,
        &project.connector,
        &project.config.reviews.fact_table,
    )
    .await?;

    let mut table = Table::new();
    table.set_header(vec!["relation", "state", "high-water mark", "rows"]);
    table.add_row(vec![
        status.relation.clone(),
        format!("{:?}", status.state).to_lowercase(),
        status
            .high_water_mark
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        status.row_count.to_string(),
    ]);
    println!("{}", table);
    Ok(true)
}
