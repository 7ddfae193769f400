// strata-core/src/application/seed.rs

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::project::SourceDefinition;
use crate::error::StrataError;
use crate::ports::connector::Connector;

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub registered: Vec<String>,
    pub missing: Vec<String>,
}

/// Exposes every configured CSV source as a view. Files that are not on
/// disk are skipped with a warning, not treated as errors.
#[instrument(skip_all, fields(sources = sources.len()))]
pub async fn register_sources(
    connector: &dyn Connector,
    project_dir: &Path,
    sources: &[SourceDefinition],
) -> Result<SeedSummary, StrataError> {
    let mut summary = SeedSummary::default();

    for source in sources {
        let raw_path = Path::new(&source.path);
        let absolute_path = if raw_path.is_absolute() {
            raw_path.to_path_buf()
        } else {
            project_dir.join(raw_path)
        };

        if absolute_path.exists() {
            connector
                .register_source(&source.name, &absolute_path.to_string_lossy())
                .await?;
            info!(source = %source.name, path = ?absolute_path, "Source registered");
            summary.registered.push(source.name.clone());
        } else {
            warn!(source = %source.name, path = ?absolute_path, "Source file not found");
            println!(
                "   ⚠️  Warning: Source file not found at {:?}",
                absolute_path
            );
            summary.missing.push(source.name.clone());
        }
    }

    Ok(summary)
}
