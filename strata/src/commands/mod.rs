// strata/src/commands/mod.rs

pub mod build;
pub mod clean;
pub mod inspect;
pub mod query;
pub mod run;
pub mod seed;
pub mod status;
pub mod test;

use anyhow::Context;
use std::path::{Path, PathBuf};

use strata_core::StrataError;
use strata_core::infrastructure::adapters::duckdb::DuckDBConnector;
use strata_core::infrastructure::config::{
    ProjectConfig, database_path, load_project_config, target_dir,
};
use strata_core::infrastructure::recorder::{CompositeRecorder, JsonlAuditLog, TracingRecorder};

/// Config + warehouse handle shared by every project-scoped command.
pub struct Project {
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub target_dir: PathBuf,
    pub connector: DuckDBConnector,
}

impl Project {
    pub fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
        load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })
    }

    pub fn open(project_dir: &Path, config: ProjectConfig) -> anyhow::Result<Self> {
        let db_path = database_path(project_dir, &config);
        let connector = DuckDBConnector::new(&db_path)
            .map_err(StrataError::from)
            .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?;

        Ok(Self {
            dir: project_dir.to_path_buf(),
            target_dir: target_dir(project_dir, &config),
            config,
            connector,
        })
    }

    /// Audit trail: `<target>/audit_log.jsonl` plus tracing events.
    pub fn recorder(&self) -> CompositeRecorder {
        CompositeRecorder::new(vec![
            Box::new(JsonlAuditLog::in_target_dir(&self.target_dir)),
            Box::new(TracingRecorder),
        ])
    }
}

pub fn new_invocation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
