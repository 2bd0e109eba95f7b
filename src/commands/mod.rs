pub mod filter;
pub mod grep;
pub mod info;

use crate::cli::{Args, InputArgs};
use crate::config::Config;
use crate::sequence_processor::{FastxReader, FastxWriter, Pipeline, SequenceFormat};
use crate::utils::progress_bar_builder::{ProgressBarBuilder, RECORDS_TEMPLATE};
use anyhow::{anyhow, bail, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Settings shared by every subcommand, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub threads: usize,
    pub channel_capacity: Option<usize>,
    pub keep_order: bool,
    pub print_header: bool,
    pub quiet: bool,
    pub nxx: Vec<u8>,
}

impl RunContext {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn new(args: &Args, config: &Config) -> Self {
        Self {
            threads: args.threads.or(config.threads).unwrap_or(0),
            channel_capacity: config.channel_capacity,
            keep_order: args.keep_order || config.keep_order,
            print_header: args.print_header,
            quiet: args.quiet,
            nxx: config.nxx.clone(),
        }
    }

    /// Builds the worker pool, with a records spinner unless `quiet`.
    pub fn pipeline(&self, label: &str) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new(self.threads).keep_order(self.keep_order);
        if let Some(capacity) = self.channel_capacity {
            if capacity == 0 {
                bail!("channel_capacity must be at least 1");
            }
            pipeline = pipeline.with_channel_capacity(capacity);
        }
        let progress = ProgressBarBuilder::new(label)
            .with_template(RECORDS_TEMPLATE)
            .with_tick()
            .hidden(self.quiet)
            .build()?;
        Ok(pipeline.with_progress(progress))
    }
}

/// Resolves the input format and opens the reader.
///
/// An explicit `--fasta`/`--fastq` flag wins; otherwise the format is
/// guessed from the file name. STDIN always needs a flag.
pub fn open_input(input: &InputArgs) -> Result<FastxReader> {
    match input.path() {
        Some(path) => {
            let format = input
                .format_flag()
                .or_else(|| SequenceFormat::guess(path))
                .ok_or_else(|| {
                    anyhow!(
                        "Cannot guess the format of {}; pass --fasta or --fastq",
                        path.display()
                    )
                })?;
            log::debug!("Reading {} as {}", path.display(), format);
            FastxReader::from_path(path, format)
        }
        None => {
            let format = input
                .format_flag()
                .ok_or_else(|| anyhow!("Reading from STDIN requires --fasta or --fastq"))?;
            log::debug!("Reading STDIN as {}", format);
            FastxReader::from_stdin(format)
        }
    }
}

/// Display label for the progress spinner
pub(crate) fn input_label(input: &InputArgs) -> String {
    input
        .path()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

/// Opens the record writer for `output`, or STDOUT.
pub(crate) fn open_output(
    output: Option<&PathBuf>,
    format: SequenceFormat,
) -> Result<FastxWriter<Box<dyn Write + Send>>> {
    let inner: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            anyhow!("Failed to create output file {}: {}", path.display(), e)
        })?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    Ok(FastxWriter::new(inner, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write as _;

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            threads: Some(2),
            channel_capacity: Some(16),
            keep_order: false,
            nxx: vec![50],
        };
        let args = Args::try_parse_from(["catseq", "info", "-t", "6", "--keep-order", "x.fa"]).unwrap();
        let ctx = RunContext::new(&args, &config);
        assert_eq!(ctx.threads, 6);
        assert_eq!(ctx.channel_capacity, Some(16));
        assert!(ctx.keep_order);
        assert_eq!(ctx.nxx, vec![50]);

        let args = Args::try_parse_from(["catseq", "info", "x.fa"]).unwrap();
        let ctx = RunContext::new(&args, &config);
        assert_eq!(ctx.threads, 2);
        assert!(!ctx.keep_order);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = Config {
            channel_capacity: Some(0),
            ..Config::default()
        };
        let args = Args::try_parse_from(["catseq", "-q", "info", "x.fa"]).unwrap();
        let ctx = RunContext::new(&args, &config);
        assert!(ctx.pipeline("x").is_err());
    }

    #[test]
    fn test_open_input_format_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, ">r1\nACGT").unwrap();

        let mut input = InputArgs {
            input: Some(path),
            ..InputArgs::default()
        };
        assert!(open_input(&input).is_err());

        input.fasta = true;
        let reader = open_input(&input).unwrap();
        assert_eq!(reader.format(), SequenceFormat::Fasta);
        assert_eq!(reader.count(), 1);

        assert!(open_input(&InputArgs::default()).is_err());
    }
}
