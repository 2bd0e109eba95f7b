use super::sequence::Sequence;
use crate::error::Result;

/// A single-threaded source of records.
///
/// Returns `None` at end of stream. A decode error is fatal for the whole
/// pipeline.
pub trait SequenceReader {
    fn next_sequence(&mut self) -> Option<Result<Sequence>>;
}

impl<I> SequenceReader for I
where
    I: Iterator<Item = Result<Sequence>>,
{
    fn next_sequence(&mut self) -> Option<Result<Sequence>> {
        self.next()
    }
}
