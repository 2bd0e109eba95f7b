use crate::sequence_processor::{GrepField, SequenceFormat};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// catseq is a toolbox for performing common operations on sequence data.
#[derive(Parser, Debug)]
#[command(name = "catseq", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Worker threads (0 = all available cores)
    #[arg(short = 't', long, global = true)]
    pub threads: Option<usize>,

    /// Emit records in input order instead of completion order
    #[arg(long, global = true)]
    pub keep_order: bool,

    /// Include a column header in tabular output
    #[arg(long, global = true)]
    pub print_header: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Hide the progress spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Where to read records from and how to decode them
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input FASTA/FASTQ file, optionally compressed; reads STDIN when absent or "-"
    #[arg(value_name = "SEQUENCE_FILE")]
    pub input: Option<PathBuf>,

    /// Input is in FASTA format
    #[arg(long, conflicts_with = "fastq")]
    pub fasta: bool,

    /// Input is in FASTQ format
    #[arg(long)]
    pub fastq: bool,
}

impl InputArgs {
    /// Explicit format flag, if any
    pub fn format_flag(&self) -> Option<SequenceFormat> {
        match (self.fasta, self.fastq) {
            (true, _) => Some(SequenceFormat::Fasta),
            (_, true) => Some(SequenceFormat::Fastq),
            _ => None,
        }
    }

    /// The input path, `None` meaning STDIN
    pub fn path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show basic sequence info: name, length, GC content, mean quality
    Info {
        #[command(flatten)]
        input: InputArgs,

        /// Only output summary info for all sequences
        #[arg(short, long)]
        summary: bool,

        /// Nxx percentiles to report, e.g. 20,50,80
        #[arg(long, value_delimiter = ',', value_name = "PERCENTILES")]
        nxx: Option<Vec<u8>>,

        /// Render the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter sequences from (multi-)sequence files
    Filter {
        #[command(flatten)]
        input: InputArgs,

        /// Minimum sequence length to keep (negative = unbounded)
        #[arg(long, allow_negative_numbers = true)]
        length_min: Option<i64>,

        /// Maximum sequence length to keep (negative = unbounded)
        #[arg(long, allow_negative_numbers = true)]
        length_max: Option<i64>,

        /// Keep reads with a mean error rate equal to or greater than this
        #[arg(long, allow_negative_numbers = true)]
        error_rate_avg_min: Option<f64>,

        /// Keep reads with a mean error rate equal to or less than this
        #[arg(long, allow_negative_numbers = true)]
        error_rate_avg_max: Option<f64>,

        /// Keep reads with a mean Phred base quality equal to or greater than this
        #[arg(long, allow_negative_numbers = true)]
        qual_avg_min: Option<f64>,

        /// Keep reads with a mean Phred base quality equal to or less than this
        #[arg(long, allow_negative_numbers = true)]
        qual_avg_max: Option<f64>,

        /// Write kept records here instead of STDOUT
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Match a regular expression in sequences from (multi-)sequence files
    Grep {
        /// Regular expression
        pattern: String,

        #[command(flatten)]
        input: InputArgs,

        /// Which field to match the pattern against
        #[arg(short, long, value_enum, default_value_t = GrepField::Header)]
        field: GrepField,

        /// Select records that do not match
        #[arg(short = 'v', long)]
        invert_match: bool,

        /// Case-insensitive matching
        #[arg(short, long)]
        ignore_case: bool,

        /// Write matching records here instead of STDOUT
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
