use crate::error::{PipelineError, Result};
use crate::sequence_processor::core::{Sequence, SequenceProcessor, Verdict};
use clap::ValueEnum;
use regex::bytes::{Regex, RegexBuilder};

/// Which part of a record a pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GrepField {
    /// Identifier and description
    #[default]
    Header,
    /// Sequence bases
    Seq,
    /// Header or sequence
    Both,
}

/// Keeps records matching a regular expression.
#[derive(Debug, Clone)]
pub struct GrepProcessor {
    regex: Regex,
    field: GrepField,
    invert: bool,
}

impl GrepProcessor {
    pub fn new(pattern: &str, field: GrepField, ignore_case: bool, invert: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| PipelineError::InvalidConfig(format!("bad pattern: {}", e)))?;
        Ok(Self {
            regex,
            field,
            invert,
        })
    }

    fn header_matches(&self, sequence: &Sequence) -> bool {
        self.regex.is_match(sequence.id.as_bytes())
            || sequence
                .description
                .as_deref()
                .is_some_and(|desc| self.regex.is_match(desc.as_bytes()))
    }

    pub fn is_match(&self, sequence: &Sequence) -> bool {
        let matched = match self.field {
            GrepField::Header => self.header_matches(sequence),
            GrepField::Seq => self.regex.is_match(&sequence.data),
            GrepField::Both => {
                self.header_matches(sequence) || self.regex.is_match(&sequence.data)
            }
        };
        matched != self.invert
    }
}

impl SequenceProcessor for GrepProcessor {
    type Output = Verdict;

    fn process(&self, sequence: Sequence) -> Result<Verdict> {
        if self.is_match(&sequence) {
            Ok(Verdict::Kept(sequence))
        } else {
            Ok(Verdict::Dropped)
        }
    }
}
