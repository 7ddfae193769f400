// strata-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid date for '{field}': '{value}'")]
    #[diagnostic(
        code(strata::domain::config::date),
        help("Dates must be calendar dates in the form YYYY-MM-DD (ex: 2024-01-31).")
    )]
    InvalidDate { field: String, value: String },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(strata::domain::config),
        help("Check the 'reviews', 'listings' and 'checks' sections of strata_project.yaml.")
    )]
    InvalidConfiguration(String),

    #[error("Unknown default window policy '{0}'")]
    #[diagnostic(
        code(strata::domain::config::window),
        help("Expected one of: high_water_mark, full_history.")
    )]
    UnknownWindowPolicy(String),
}

impl DomainError {
    /// True for errors raised while reading operator-supplied configuration,
    /// as opposed to errors about the data itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. } | Self::InvalidConfiguration(_) | Self::UnknownWindowPolicy(_)
        )
    }
}
