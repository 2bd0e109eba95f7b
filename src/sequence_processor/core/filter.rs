use super::metrics::RecordMetrics;
use crate::error::{PipelineError, Result};

/// Inclusive bounds a record must satisfy to be kept.
///
/// `None` leaves a side unbounded, and so does a negative float bound. Quality
/// bounds only apply to records that carry qualities; for anything else they
/// hold vacuously.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_error_rate: Option<f64>,
    pub max_error_rate: Option<f64>,
    pub min_mean_quality: Option<f64>,
    pub max_mean_quality: Option<f64>,
}

impl FilterConfig {
    /// A config that keeps every record
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_error_rate(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_error_rate = active(min);
        self.max_error_rate = active(max);
        self
    }

    pub fn with_mean_quality(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_mean_quality = active(min);
        self.max_mean_quality = active(max);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(PipelineError::InvalidConfig(format!(
                    "minimum length {} exceeds maximum length {}",
                    min, max
                )));
            }
        }
        check_float_bounds("mean error rate", self.min_error_rate, self.max_error_rate)?;
        check_float_bounds("mean quality", self.min_mean_quality, self.max_mean_quality)
    }

    /// Whether a record with these metrics passes every bound.
    pub fn matches(&self, metrics: &RecordMetrics) -> bool {
        let length = metrics.length;
        if self.min_length.is_some_and(|min| length < min)
            || self.max_length.is_some_and(|max| length > max)
        {
            return false;
        }

        within(
            metrics.mean_error_probability(),
            self.min_error_rate,
            self.max_error_rate,
        ) && within(
            metrics.mean_quality(),
            self.min_mean_quality,
            self.max_mean_quality,
        )
    }
}

/// Drops a negative bound; NaN is kept so `validate` can reject it.
fn active(bound: Option<f64>) -> Option<f64> {
    bound.filter(|b| b.is_nan() || *b >= 0.0)
}

fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    let (min, max) = (active(min), active(max));
    match value {
        Some(v) => min.map_or(true, |min| v >= min) && max.map_or(true, |max| v <= max),
        None => true,
    }
}

fn check_float_bounds(name: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
    let (min, max) = (active(min), active(max));
    if [min, max].into_iter().flatten().any(f64::is_nan) {
        return Err(PipelineError::InvalidConfig(format!(
            "{} bound must be a number",
            name
        )));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(PipelineError::InvalidConfig(format!(
                "minimum {} {} exceeds maximum {}",
                name, min, max
            )));
        }
    }
    Ok(())
}
