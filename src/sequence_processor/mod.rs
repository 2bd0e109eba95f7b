pub mod collectors;
pub mod core;
pub mod processors;
pub mod readers;
pub mod reorder;
pub mod threading;
pub mod writers;

// Re-export commonly used items
pub use collectors::{Collector, SinkCollector, SummaryCollector, SummaryReport};
pub use core::{FilterConfig, RecordMetrics, Sequence, SequenceProcessor, SequenceReader, Verdict};
pub use processors::{FilterProcessor, GrepField, GrepProcessor, MetricsProcessor};
pub use readers::{FastxReader, SequenceFormat};
pub use threading::{CancellationToken, Pipeline};
pub use writers::{FastxWriter, SequenceWriter};
