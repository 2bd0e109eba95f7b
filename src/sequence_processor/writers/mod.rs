mod fastx;

pub use fastx::FastxWriter;

use crate::sequence_processor::core::Sequence;
use std::io;

/// Destination for records kept by a filter or grep run.
pub trait SequenceWriter {
    fn write_sequence(&mut self, sequence: &Sequence) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects records in memory
impl SequenceWriter for Vec<Sequence> {
    fn write_sequence(&mut self, sequence: &Sequence) -> io::Result<()> {
        self.push(sequence.clone());
        Ok(())
    }
}
