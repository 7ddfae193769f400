// strata/src/commands/query.rs
//
// USE CASE: Execute a raw SQL statement (ad-hoc).

use std::path::Path;

use strata_core::application::execute_query;

use super::Project;

pub async fn execute(project_dir: &Path, query: &str) -> anyhow::Result<bool> {
    let config = Project::load_config(project_dir)?;
    let project = Project::open(project_dir, config)?;

    execute_query(&project.connector, query).await?;
    println!("✅ Statement executed.");
    Ok(true)
}
