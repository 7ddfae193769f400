pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use project::{database_path, load_project_config, target_dir};
