// strata/src/commands/seed.rs
//
// USE CASE: Expose the configured CSV files as views.

use anyhow::Context;
use std::path::Path;

use strata_core::application::register_sources;

use super::Project;

pub async fn execute(project_dir: &Path) -> anyhow::Result<bool> {
    let config = Project::load_config(project_dir)?;
    let project = Project::open(project_dir, config)?;

    println!("🌱 Registering {} sources...", project.config.sources.len());
    let summary = register_sources(&project.connector, &project.dir, &project.config.sources)
        .await
        .context("Failed to register sources")?;

    for name in &summary.registered {
        println!("   ✅ {}", name);
    }
    println!(
        "✨ {} registered, {} missing.",
        summary.registered.len(),
        summary.missing.len()
    );
    Ok(summary.missing.is_empty())
}
