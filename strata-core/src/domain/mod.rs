pub mod error;
pub mod project;
pub mod quality;
pub mod review;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
