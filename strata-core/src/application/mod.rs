// strata-core/src/application/mod.rs

pub mod clean;
pub mod engine;
pub mod loader;
pub mod seed;
pub mod status;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use strata_core::application::{run_incremental_load, run_tests};`
// sans avoir à connaître la structure interne des fichiers.

pub use clean::clean_project;
pub use engine::execute_query;
pub use loader::{LoadReport, LoadRequest, run_incremental_load};
pub use seed::{SeedSummary, register_sources};
pub use status::{LoaderStatus, loader_status};
pub use validation::run_tests;
