pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod seqmath;
pub mod sequence_processor;
pub(crate) mod utils;

pub use error::{PipelineError, Result};
