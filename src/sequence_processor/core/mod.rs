pub(crate) mod filter;
pub(crate) mod metrics;
pub(crate) mod processor;
pub(crate) mod sequence;
pub(crate) mod stats;
mod reader;

pub use filter::FilterConfig;
pub use metrics::{BaseComposition, QualitySums, RecordMetrics};
pub use processor::{SequenceProcessor, Verdict};
pub use reader::SequenceReader;
pub use sequence::Sequence;
pub use stats::ProcessingStats;
