use crate::seqmath::quality::QualityError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type used throughout the streaming pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// Every variant is fatal: the pipeline never reports statistics computed
/// over a partial set of records.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The record source failed to decode the record at the given 0-based index
    #[error("Failed to decode record #{record}: {source}")]
    Decode {
        record: u64,
        #[source]
        source: BoxError,
    },

    /// A base quality fell outside the supported Phred range
    #[error("Invalid quality in record '{record}': {source}")]
    Quality {
        record: String,
        #[source]
        source: QualityError,
    },

    /// The output writer failed
    #[error("Failed to write record: {0}")]
    Sink(#[from] std::io::Error),

    /// A filter bound, percentile, or pool setting is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller raised the cancellation token before the stream was drained
    #[error("Pipeline cancelled before all records were processed")]
    Cancelled,

    /// A pipeline thread panicked
    #[error("Pipeline {0} thread panicked")]
    Panicked(String),
}

impl PipelineError {
    pub fn decode(record: u64, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            record,
            source: source.into(),
        }
    }
}
