// strata-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrats: Connector, ReviewStore, RunRecorder
pub mod ports;

// 2. Domain (Cœur du métier)
// Surrogate key, date window, incremental plan, quality outcomes.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, YAML config, audit log, filesystem.
pub mod infrastructure;

// 4. Application (Use Cases)
// Load, test, seed, status, clean.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::StrataError;
