use super::{input_label, open_input, open_output, RunContext};
use crate::cli::InputArgs;
use crate::sequence_processor::{GrepField, GrepProcessor, SinkCollector};
use anyhow::Result;
use log::info;
use std::path::PathBuf;

pub fn run(
    ctx: &RunContext,
    input: &InputArgs,
    pattern: &str,
    field: GrepField,
    invert_match: bool,
    ignore_case: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let processor = GrepProcessor::new(pattern, field, ignore_case, invert_match)?;
    let mut reader = open_input(input)?;
    let writer = open_output(output.as_ref(), reader.format())?;
    let pipeline = ctx.pipeline(&input_label(input))?;

    let ((_, counts), _) = pipeline.run(&mut reader, &processor, SinkCollector::new(writer))?;
    info!("{} records matched, {} did not", counts.kept, counts.dropped);
    Ok(())
}
