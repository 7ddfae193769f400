// strata/src/commands/build.rs
//
// USE CASE: Load, then check.

use std::path::Path;

use super::{Project, run, test};
use crate::cli::WindowArgs;

pub async fn execute(project_dir: &Path, window: &WindowArgs) -> anyhow::Result<bool> {
    if !run::execute(project_dir, window).await? {
        return Ok(false);
    }

    println!("\n🧪 Testing...");
    let config = Project::load_config(project_dir)?;
    let project = Project::open(project_dir, config)?;
    test::check(&project).await
}
