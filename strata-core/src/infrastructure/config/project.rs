// strata-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::error::StrataError;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["strata_project.yaml", "strata.yaml"];

#[instrument(skip(project_dir))] // Log automatique de l'entrée/sortie de la fonction
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, StrataError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config = parse_project_config(&content)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // STRATA_TARGET_PATH=/tmp/build strata run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    // 4. Validation after overrides, so an empty override is caught too
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    config.check_relations()?;

    Ok(config)
}

pub fn parse_project_config(content: &str) -> Result<ProjectConfig, InfrastructureError> {
    serde_yaml::from_str(content).map_err(InfrastructureError::YamlError)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{} (checked: {:?})",
        root.display(),
        CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("STRATA_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("STRATA_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Some(val) = lookup("STRATA_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
}

/// Absolute location of the DuckDB file (":memory:" is passed through).
pub fn database_path(project_dir: &Path, config: &ProjectConfig) -> String {
    if config.database == ":memory:" {
        return config.database.clone();
    }
    let raw = Path::new(&config.database);
    if raw.is_absolute() {
        config.database.clone()
    } else {
        project_dir.join(raw).to_string_lossy().into_owned()
    }
}

pub fn target_dir(project_dir: &Path, config: &ProjectConfig) -> PathBuf {
    project_dir.join(&config.target_path)
}
