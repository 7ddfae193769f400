// strata-core/src/domain/review/mod.rs

pub mod loader;
pub mod record;
pub mod surrogate_key;
pub mod window;

pub use loader::{FactSnapshot, IncrementalLoader, LoadOptions, LoadPlan, LoaderState, SkipCounts};
pub use record::{RawReview, ReviewFact};
pub use surrogate_key::SurrogateKey;
pub use window::{DefaultWindow, LowerBound, ResolvedWindow, WindowOrigin, WindowRequest};
