//! Phred quality score to error probability conversion.
//!
//! A Phred score Q relates to the probability P that the base call is wrong by
//! `Q = -10 * log10(P)`, so `P = 10^(-Q/10)`. Scores are looked up in a table
//! built once on first use and shared read-only by every worker.

use std::sync::LazyLock;

/// Highest Phred score the lookup table covers
pub const MAX_PHRED: i32 = 200;

/// ASCII offset of Sanger / Illumina 1.8+ encoded qualities
pub const PHRED_OFFSET: i32 = 33;

static ERROR_PROB_FOR_Q: LazyLock<[f64; MAX_PHRED as usize + 1]> = LazyLock::new(|| {
    let mut table = [0.0; MAX_PHRED as usize + 1];
    for (q, p) in table.iter_mut().enumerate() {
        *p = 10f64.powf(-(q as f64) / 10.0);
    }
    table
});

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityError {
    #[error("quality value {0} out of bounds [0,200]")]
    OutOfRange(i32),
}

/// Returns the error probability for a Phred score in `[0, 200]`.
///
/// # Examples
/// ```
/// use catseq::seqmath::error_probability;
///
/// assert!((error_probability(10).unwrap() - 0.1).abs() < 1e-12);
/// assert!(error_probability(201).is_err());
/// ```
pub fn error_probability(q: i32) -> Result<f64, QualityError> {
    if (0..=MAX_PHRED).contains(&q) {
        Ok(ERROR_PROB_FOR_Q[q as usize])
    } else {
        Err(QualityError::OutOfRange(q))
    }
}

/// Decodes one Phred+33 ASCII quality character into its score.
#[inline]
pub fn decode_phred33(ascii: u8) -> i32 {
    i32::from(ascii) - PHRED_OFFSET
}
