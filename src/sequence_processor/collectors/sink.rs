use super::base::Collector;
use crate::error::Result;
use crate::sequence_processor::core::Verdict;
use crate::sequence_processor::writers::SequenceWriter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub kept: u64,
    pub dropped: u64,
}

/// Forwards every kept record to a [`SequenceWriter`] exactly once.
pub struct SinkCollector<W: SequenceWriter + Send> {
    writer: W,
    counts: FilterCounts,
}

impl<W: SequenceWriter + Send> SinkCollector<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            counts: FilterCounts::default(),
        }
    }
}

impl<W: SequenceWriter + Send> Collector for SinkCollector<W> {
    type Item = Verdict;
    type Output = (W, FilterCounts);

    fn collect(&mut self, verdict: Verdict) -> Result<()> {
        match verdict {
            Verdict::Kept(sequence) => {
                self.writer.write_sequence(&sequence)?;
                self.counts.kept += 1;
            }
            Verdict::Dropped => self.counts.dropped += 1,
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(W, FilterCounts)> {
        self.writer.flush()?;
        Ok((self.writer, self.counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::core::Sequence;

    #[test]
    fn test_counts_and_forwards() {
        let mut sink = SinkCollector::new(Vec::new());
        sink.collect(Verdict::Kept(Sequence::new("a", "AC"))).unwrap();
        sink.collect(Verdict::Dropped).unwrap();
        sink.collect(Verdict::Kept(Sequence::new("b", "GT"))).unwrap();

        let (written, counts) = sink.finish().unwrap();
        assert_eq!(counts, FilterCounts { kept: 2, dropped: 1 });
        let ids: Vec<_> = written.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
