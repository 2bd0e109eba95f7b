use super::{input_label, open_input, open_output, RunContext};
use crate::cli::InputArgs;
use crate::sequence_processor::{FilterConfig, FilterProcessor, SinkCollector};
use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Bounds as given on the command line; a negative value means unbounded.
#[derive(Debug, Clone, Default)]
pub struct FilterBounds {
    pub length_min: Option<i64>,
    pub length_max: Option<i64>,
    pub error_rate_avg_min: Option<f64>,
    pub error_rate_avg_max: Option<f64>,
    pub qual_avg_min: Option<f64>,
    pub qual_avg_max: Option<f64>,
}

impl From<FilterBounds> for FilterConfig {
    fn from(b: FilterBounds) -> Self {
        FilterConfig::unbounded()
            .with_length(length_bound(b.length_min), length_bound(b.length_max))
            .with_error_rate(b.error_rate_avg_min, b.error_rate_avg_max)
            .with_mean_quality(b.qual_avg_min, b.qual_avg_max)
    }
}

fn length_bound(bound: Option<i64>) -> Option<usize> {
    bound.and_then(|b| usize::try_from(b).ok())
}

pub fn run(
    ctx: &RunContext,
    input: &InputArgs,
    bounds: FilterBounds,
    output: Option<PathBuf>,
) -> Result<()> {
    // Reject bad bounds before touching any file
    let processor = FilterProcessor::new(bounds.into())?;
    let mut reader = open_input(input)?;
    let writer = open_output(output.as_ref(), reader.format())?;
    let pipeline = ctx.pipeline(&input_label(input))?;

    let ((_, counts), _) = pipeline.run(&mut reader, &processor, SinkCollector::new(writer))?;
    info!("Kept {} records, dropped {}", counts.kept, counts.dropped);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_into_config() {
        let config: FilterConfig = FilterBounds {
            length_min: Some(10),
            qual_avg_max: Some(30.0),
            ..FilterBounds::default()
        }
        .into();
        assert_eq!(config.min_length, Some(10));
        assert_eq!(config.max_length, None);
        assert_eq!(config.max_mean_quality, Some(30.0));
        assert_eq!(config.min_error_rate, None);
    }

    #[test]
    fn test_negative_bounds_into_config() {
        let config: FilterConfig = FilterBounds {
            length_max: Some(-1),
            qual_avg_max: Some(-1.0),
            error_rate_avg_min: Some(0.01),
            ..FilterBounds::default()
        }
        .into();
        assert_eq!(
            config,
            FilterConfig::unbounded().with_error_rate(Some(0.01), None)
        );
    }

    #[test]
    fn test_inverted_bounds_fail_before_reading() {
        let ctx = RunContext {
            threads: 1,
            channel_capacity: None,
            keep_order: false,
            print_header: false,
            quiet: true,
            nxx: vec![50],
        };
        let input = InputArgs {
            input: Some(PathBuf::from("/nonexistent/reads.fa")),
            ..InputArgs::default()
        };
        let bounds = FilterBounds {
            length_min: Some(10),
            length_max: Some(5),
            ..FilterBounds::default()
        };
        let err = run(&ctx, &input, bounds, None).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
