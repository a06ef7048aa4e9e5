pub mod store;
pub mod ttl;

pub use store::{AnalysisStore, MemoryAnalysisStore};
pub use ttl::{ttl_minutes, MAX_TTL_MINUTES, MIN_TTL_MINUTES};
