use crate::error::Result;
use crate::sequence_processor::core::{
    FilterConfig, RecordMetrics, Sequence, SequenceProcessor, Verdict,
};
use log::trace;

/// Keeps records whose length and quality fall inside a [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct FilterProcessor {
    config: FilterConfig,
}

impl FilterProcessor {
    /// Validates `config` and freezes it for the lifetime of the processor.
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl SequenceProcessor for FilterProcessor {
    type Output = Verdict;

    fn process(&self, sequence: Sequence) -> Result<Verdict> {
        let metrics = RecordMetrics::from_sequence(&sequence)?;
        if self.config.matches(&metrics) {
            trace!("PASSED FILTER {} (length {})", sequence.id, metrics.length);
            Ok(Verdict::Kept(sequence))
        } else {
            Ok(Verdict::Dropped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_keeps_matching_record_unchanged() {
        let processor = FilterProcessor::new(FilterConfig::unbounded()).unwrap();
        let seq = Sequence::new("r1", "ACGT")
            .with_description("sample=1")
            .with_quality("IIII");
        assert_eq!(
            processor.process(seq.clone()).unwrap(),
            Verdict::Kept(seq)
        );
    }

    #[test]
    fn test_drops_short_record() {
        let config = FilterConfig::unbounded().with_length(Some(5), None);
        let processor = FilterProcessor::new(config).unwrap();
        let verdict = processor.process(Sequence::new("r1", "ACGT")).unwrap();
        assert_eq!(verdict, Verdict::Dropped);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FilterConfig::unbounded().with_length(Some(5), Some(1));
        assert!(matches!(
            FilterProcessor::new(config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_negative_bound_means_unbounded() {
        let config = FilterConfig::unbounded().with_mean_quality(None, Some(-1.0));
        let processor = FilterProcessor::new(config).unwrap();
        let q40 = Sequence::new("r1", "ACGT").with_quality("IIII");
        assert!(processor.process(q40).unwrap().is_kept());
    }

    #[test]
    fn test_bad_quality_is_an_error() {
        let processor = FilterProcessor::new(FilterConfig::unbounded()).unwrap();
        let seq = Sequence::new("r1", "A").with_quality(vec![0xff]);
        assert!(matches!(
            processor.process(seq),
            Err(PipelineError::Quality { .. })
        ));
    }
}
