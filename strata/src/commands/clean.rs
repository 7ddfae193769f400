// strata/src/commands/clean.rs
//
// USE CASE: Clean build artifacts.

use std::path::Path;

use strata_core::application::clean_project;

pub fn execute(project_dir: &Path) -> anyhow::Result<bool> {
    let removed = clean_project(project_dir)?;
    if removed.is_empty() {
        println!("✨ Nothing to clean.");
    }
    Ok(true)
}
