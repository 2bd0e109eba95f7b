//! Numeric building blocks shared by the transforms and the aggregator.

pub mod quality;
pub mod stats;

pub use quality::{error_probability, QualityError, MAX_PHRED, PHRED_OFFSET};
pub use stats::{median, Nxx};
