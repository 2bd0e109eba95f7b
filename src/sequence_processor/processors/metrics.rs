use crate::error::Result;
use crate::sequence_processor::core::{RecordMetrics, Sequence, SequenceProcessor};

/// Metrics of one record together with the name used in per-record lines.
///
/// The bases themselves are released once the metrics are extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInfo {
    pub id: String,
    pub metrics: RecordMetrics,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsProcessor;

impl SequenceProcessor for MetricsProcessor {
    type Output = RecordInfo;

    fn process(&self, sequence: Sequence) -> Result<RecordInfo> {
        let metrics = RecordMetrics::from_sequence(&sequence)?;
        Ok(RecordInfo {
            id: sequence.id,
            metrics,
        })
    }
}
