use super::SequenceWriter;
use crate::sequence_processor::core::Sequence;
use crate::sequence_processor::readers::SequenceFormat;
use bio::io::{fasta, fastq};
use std::io::{self, Write};

/// Writes records back out in FASTA or FASTQ.
pub enum FastxWriter<W: Write> {
    Fasta(fasta::Writer<W>),
    Fastq(fastq::Writer<W>),
}

impl<W: Write> FastxWriter<W> {
    pub fn new(inner: W, format: SequenceFormat) -> Self {
        match format {
            SequenceFormat::Fasta => Self::Fasta(fasta::Writer::new(inner)),
            SequenceFormat::Fastq => Self::Fastq(fastq::Writer::new(inner)),
        }
    }
}

impl<W: Write> SequenceWriter for FastxWriter<W> {
    fn write_sequence(&mut self, sequence: &Sequence) -> io::Result<()> {
        let desc = sequence.description.as_deref();
        match self {
            Self::Fasta(writer) => writer.write(&sequence.id, desc, &sequence.data),
            Self::Fastq(writer) => {
                let qual = sequence.quality.as_deref().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("record '{}' has no qualities to write as FASTQ", sequence.id),
                    )
                })?;
                writer.write(&sequence.id, desc, &sequence.data, qual)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Fasta(writer) => writer.flush(),
            Self::Fastq(writer) => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_fastq() {
        let mut out = Vec::new();
        {
            let mut writer = FastxWriter::new(&mut out, SequenceFormat::Fastq);
            let seq = Sequence::new("r1", "ACGT")
                .with_description("x=1")
                .with_quality("IIII");
            writer.write_sequence(&seq).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "@r1 x=1\nACGT\n+\nIIII\n");
    }

    #[test]
    fn test_write_fasta() {
        let mut out = Vec::new();
        {
            let mut writer = FastxWriter::new(&mut out, SequenceFormat::Fasta);
            writer.write_sequence(&Sequence::new("c1", "GGCC")).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), ">c1\nGGCC\n");
    }

    #[test]
    fn test_fastq_requires_quality() {
        let mut writer = FastxWriter::new(Vec::new(), SequenceFormat::Fastq);
        assert!(writer.write_sequence(&Sequence::new("c1", "GGCC")).is_err());
    }
}
