use crate::error::{PipelineError, Result};
use crate::sequence_processor::core::Sequence;
use anyhow::Context;
use bio::io::{fasta, fastq};
use niffler::get_reader;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

/// Bytes needed by niffler to sniff the compression format
const SNIFF_LEN: u64 = 5;

const BUFFER_CAPACITY: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SequenceFormat {
    Fasta,
    Fastq,
}

impl SequenceFormat {
    /// Guesses the format from a file name, looking past one compression suffix.
    pub fn guess(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        let stem = [".gz", ".bgz", ".bz2", ".xz", ".zst"]
            .iter()
            .find_map(|ext| name.strip_suffix(ext))
            .unwrap_or(&name);
        let ext = Path::new(stem).extension()?.to_str()?;
        match ext {
            "fastq" | "fq" => Some(Self::Fastq),
            "fasta" | "fa" | "fna" | "faa" => Some(Self::Fasta),
            _ => None,
        }
    }
}

impl fmt::Display for SequenceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fasta => write!(f, "fasta"),
            Self::Fastq => write!(f, "fastq"),
        }
    }
}

enum Records {
    Fasta(fasta::Records<BufReader<Box<dyn Read>>>),
    Fastq(fastq::Records<BufReader<Box<dyn Read>>>),
}

/// Sequential FASTA/FASTQ source with transparent decompression.
pub struct FastxReader {
    records: Records,
    format: SequenceFormat,
    index: u64,
}

impl FastxReader {
    pub fn from_path(path: &Path, format: SequenceFormat) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::new(Box::new(file), format)
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn from_stdin(format: SequenceFormat) -> anyhow::Result<Self> {
        Self::new(Box::new(io::stdin()), format)
    }

    pub fn new(mut input: Box<dyn Read>, format: SequenceFormat) -> anyhow::Result<Self> {
        // niffler cannot sniff inputs shorter than its magic-number window
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        (&mut input).take(SNIFF_LEN).read_to_end(&mut head)?;
        let short = (head.len() as u64) < SNIFF_LEN;
        let rejoined: Box<dyn Read> = Box::new(Cursor::new(head).chain(input));
        let inner = if short {
            rejoined
        } else {
            let (reader, compression) = get_reader(rejoined)?;
            log::debug!("Input compression: {:?}", compression);
            reader
        };

        let buffered = BufReader::with_capacity(BUFFER_CAPACITY, inner);
        let records = match format {
            SequenceFormat::Fasta => Records::Fasta(fasta::Reader::from_bufread(buffered).records()),
            SequenceFormat::Fastq => Records::Fastq(fastq::Reader::from_bufread(buffered).records()),
        };

        Ok(Self {
            records,
            format,
            index: 0,
        })
    }

    pub fn format(&self) -> SequenceFormat {
        self.format
    }
}

impl Iterator for FastxReader {
    type Item = Result<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let next = match &mut self.records {
            Records::Fasta(records) => records.next().map(|r| {
                r.map(|record| Sequence {
                    id: record.id().to_string(),
                    description: record.desc().map(str::to_string),
                    data: record.seq().to_vec(),
                    quality: None,
                })
                .map_err(|e| PipelineError::decode(index, e))
            }),
            Records::Fastq(records) => records.next().map(|r| {
                r.map(|record| Sequence {
                    id: record.id().to_string(),
                    description: record.desc().map(str::to_string),
                    data: record.seq().to_vec(),
                    quality: Some(record.qual().to_vec()),
                })
                .map_err(|e| PipelineError::decode(index, e))
            }),
        };
        self.index += 1;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn reader(data: &'static str, format: SequenceFormat) -> FastxReader {
        FastxReader::new(Box::new(data.as_bytes()), format).unwrap()
    }

    #[test]
    fn test_guess_format() {
        let cases = [
            ("reads.fastq", Some(SequenceFormat::Fastq)),
            ("reads.FQ", Some(SequenceFormat::Fastq)),
            ("reads.fq.gz", Some(SequenceFormat::Fastq)),
            ("genome.fa", Some(SequenceFormat::Fasta)),
            ("genome.fna.bz2", Some(SequenceFormat::Fasta)),
            ("proteins.faa", Some(SequenceFormat::Fasta)),
            ("reads.bam", None),
            ("reads", None),
        ];
        for (name, expected) in cases {
            assert_eq!(SequenceFormat::guess(&PathBuf::from(name)), expected, "{}", name);
        }
    }

    #[test]
    fn test_read_fastq() {
        let records: Vec<_> = reader("@r1 lane=1\nACGT\n+\nIIII\n@r2\nGG\n+\n!!\n", SequenceFormat::Fastq)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[0].description.as_deref(), Some("lane=1"));
        assert_eq!(records[0].quality.as_deref(), Some(&b"IIII"[..]));
        assert_eq!(records[1].data, b"GG");
    }

    #[test]
    fn test_read_fasta_multiline() {
        let records: Vec<_> = reader(">c1 chr\nACGT\nAC\n>c2\nNNNN\n", SequenceFormat::Fasta)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, b"ACGTAC");
        assert_eq!(records[0].quality, None);
        assert_eq!(records[1].id, "c2");
    }

    #[test]
    fn test_short_and_empty_input() {
        assert_eq!(reader("", SequenceFormat::Fasta).count(), 0);
        let records: Vec<_> = reader(">a\nA\n", SequenceFormat::Fasta).collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_decode_error_reports_index() {
        let mut r = reader("@r1\nACGT\n+\nIIII\nnot a record\n", SequenceFormat::Fastq);
        assert!(r.next().unwrap().is_ok());
        match r.next() {
            Some(Err(PipelineError::Decode { record, .. })) => assert_eq!(record, 1),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
