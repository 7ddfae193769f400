// strata-core/src/application/clean.rs

use crate::error::StrataError;
use crate::infrastructure::config::project::load_project_config;
use std::fs;
use std::path::{Component, Path};

pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, StrataError> {
    tracing::info!("🧹 Cleaning build artifacts...");

    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        // Path traversal guard: `join` keeps `..` components, so check them explicitly.
        let rel = Path::new(&target_rel_path);
        if rel.is_absolute() || rel.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(StrataError::UnsafePath(target_rel_path));
        }

        let full_path = project_dir.join(rel);
        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            println!("   🗑️  Artifact removed: {}", target_rel_path);
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}
