// strata-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StrataError {
    // --- DOMAIN (configuration, window, schema) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, parsing, database) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- APPLICATIVES ---
    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl StrataError {
    /// Operator configuration problems, reported apart from data failures.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_configuration(),
            Self::Infrastructure(e) => e.is_configuration(),
            _ => false,
        }
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for StrataError {
    fn from(err: duckdb::Error) -> Self {
        StrataError::Infrastructure(InfrastructureError::from(err))
    }
}
