// strata/src/commands/test.rs
//
// USE CASE: Run the data checks against the fact table.

use anyhow::Context;
use comfy_table::Table;
use std::path::Path;

use strata_core::application::run_tests;
use strata_core::domain::quality::QualityReport;

use super::{Project, new_invocation_id};

pub async fn execute(project_dir: &Path) -> anyhow::Result<bool> {
    let config = Project::load_config(project_dir)?;
    let project = Project::open(project_dir, config)?;
    check(&project).await
}

/// Shared with `build`, which already holds an open project.
pub async fn check(project: &Project) -> anyhow::Result<bool> {
    let recorder = project.recorder();
    let report = run_tests(
        &project.connector,
        &project.config,
        &project.target_dir,
        &recorder,
        &new_invocation_id(),
    )
    .await
    .context("Data checks could not be executed")?;

    println!("{}", render(&report));

    if report.success() {
        println!("\n✨ All blocking checks passed.");
    } else {
        eprintln!(
            "\n❌ FAILURE. {} check(s) failed on {}.",
            report.outcomes.iter().filter(|o| o.is_blocking()).count(),
            report.relation
        );
    }
    Ok(report.success())
}

fn render(report: &QualityReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["check", "severity", "status", "failures", "details"]);
    for outcome in &report.outcomes {
        table.add_row(vec![
            outcome.check.to_string(),
            outcome.severity.to_string(),
            format!("{:?}", outcome.status).to_uppercase(),
            outcome.failures.to_string(),
            outcome.message.clone(),
        ]);
    }
    table
}
