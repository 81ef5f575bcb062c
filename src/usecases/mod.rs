//! Application use cases. The extraction/planning/download pipeline.

pub mod aggregator;
pub mod engine;
pub mod extractor;
pub mod planner;

pub use aggregator::CorpusAggregator;
pub use engine::DownloadEngine;
pub use extractor::{DialogExtraction, DialogExtractor};
