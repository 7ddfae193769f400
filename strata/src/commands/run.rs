// strata/src/commands/run.rs
//
// USE CASE: Append new reviews to the fact table.

use anyhow::Context;
use std::path::Path;

use strata_core::StrataError;
use strata_core::application::{LoadRequest, register_sources, run_incremental_load};
use strata_core::domain::project::ReviewsConfig;
use strata_core::domain::review::DefaultWindow;

use super::{Project, new_invocation_id};
use crate::cli::WindowArgs;

/// CLI flags take precedence over the `reviews` section of the config.
pub fn apply_window_overrides(
    reviews: &ReviewsConfig,
    window: &WindowArgs,
) -> Result<ReviewsConfig, StrataError> {
    let mut reviews = reviews.clone();
    if window.start_date.is_some() {
        reviews.start_date = window.start_date.clone();
    }
    if window.end_date.is_some() {
        reviews.end_date = window.end_date.clone();
    }
    if let Some(policy) = &window.default_window {
        reviews.default_window = policy.parse::<DefaultWindow>()?;
    }
    Ok(reviews)
}

pub async fn execute(project_dir: &Path, window: &WindowArgs) -> anyhow::Result<bool> {
    let start = std::time::Instant::now();

    // A. Config + window, validated before touching the warehouse
    println!("⚙️  Loading configuration...");
    let config = Project::load_config(project_dir)?;
    println!("   Project: {} (v{})", config.name, config.version);

    let reviews = apply_window_overrides(&config.reviews, window)?;
    let options = reviews.load_options().map_err(StrataError::from)?;

    // B. Warehouse + sources
    let project = Project::open(project_dir, config)?;
    println!("🔌 Registering Sources...");
    register_sources(&project.connector, &project.dir, &project.config.sources)
        .await
        .context("Failed to register sources")?;

    // C. Load
    let invocation_id = new_invocation_id();
    println!("🟢 Loading {}...", reviews.fact_table);
    let recorder = project.recorder();
    let report = run_incremental_load(
        &project.connector,
        &recorder,
        LoadRequest {
            reviews: &reviews,
            options,
            invocation_id: &invocation_id,
            today: chrono::Local::now().date_naive(),
        },
    )
    .await
    .with_context(|| format!("Incremental load of '{}' failed", reviews.fact_table))?;

    let mode = if report.was_full_load() {
        "full load"
    } else {
        "incremental"
    };
    println!("     Strategy used: {} | window {}", mode, report.window);
    println!(
        "    ✅ Appended {} rows to {} ({} scanned, {} skipped: {} without text, {} outside window, {} already loaded, {} duplicates)",
        report.rows_appended,
        report.relation,
        report.rows_scanned,
        report.skipped.total(),
        report.skipped.missing_text,
        report.skipped.outside_window,
        report.skipped.already_persisted,
        report.skipped.duplicate_in_batch,
    );
    println!("✨ Done in {:.2?}.", start.elapsed());

    Ok(true)
}
