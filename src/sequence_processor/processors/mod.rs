//! Per-record transforms run inside the worker pool.

mod filter;
mod grep;
mod metrics;

pub use filter::FilterProcessor;
pub use grep::{GrepField, GrepProcessor};
pub use metrics::{MetricsProcessor, RecordInfo};
