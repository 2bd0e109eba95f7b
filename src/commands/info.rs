use super::{input_label, open_input, RunContext};
use crate::cli::InputArgs;
use crate::sequence_processor::collectors::summary::write_record_header;
use crate::sequence_processor::{MetricsProcessor, SequenceFormat, SummaryCollector, SummaryReport};
use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};

pub fn run(
    ctx: &RunContext,
    input: &InputArgs,
    summary_only: bool,
    nxx: Option<Vec<u8>>,
    json: bool,
) -> Result<()> {
    let percentiles = nxx.unwrap_or_else(|| ctx.nxx.clone());
    let mut reader = open_input(input)?;
    let with_quality = reader.format() == SequenceFormat::Fastq;
    let pipeline = ctx.pipeline(&input_label(input))?;

    let report = if summary_only {
        let collector = SummaryCollector::<io::Sink>::new(&percentiles)?;
        let (report, _) = pipeline.run(&mut reader, &MetricsProcessor, collector)?;
        report
    } else {
        let mut out = BufWriter::new(io::stdout());
        if ctx.print_header {
            write_record_header(&mut out, with_quality)?;
        }
        let collector = SummaryCollector::new(&percentiles)?.with_record_lines(out);
        let (report, _) = pipeline.run(&mut reader, &MetricsProcessor, collector)?;
        report
    };

    let written = if summary_only {
        write_report(&report, &mut io::stdout().lock(), json)
    } else {
        write_report(&report, &mut io::stderr().lock(), json)
    };
    written.context("Failed to write summary")
}

fn write_report<W: Write>(report: &SummaryReport, out: &mut W, json: bool) -> io::Result<()> {
    if json {
        report.write_json(out)?;
    } else {
        report.write_text(out)?;
    }
    out.flush()
}
