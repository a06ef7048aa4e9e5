pub mod analyzer;
pub mod cache_sweeper;

pub use analyzer::{parse_slug, Analyzer, AnalyzerConfig};
pub use cache_sweeper::run_cache_sweeper;
