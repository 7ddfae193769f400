// strata-core/src/domain/project/mod.rs

pub mod configuration;

pub use configuration::{
    ChecksConfig, ListingColumns, ListingsConfig, ProjectConfig, ReviewColumns, ReviewsConfig,
    SourceDefinition,
};
