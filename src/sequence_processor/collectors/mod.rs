pub mod base;
pub mod sink;
pub mod summary;

pub use base::Collector;
pub use sink::{FilterCounts, SinkCollector};
pub use summary::{
    NxxEntry, QualityMeans, QualitySummary, RunningSummary, SummaryCollector, SummaryReport,
};
