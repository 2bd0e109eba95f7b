use super::sequence::Sequence;
use crate::error::{PipelineError, Result};
use crate::seqmath::quality::{decode_phred33, error_probability};

/// Base composition of a single record.
///
/// G, C and S (strong, G or C) count as GC; A, T, U and W (weak, A or T) count
/// as AT. N is tracked on its own and everything else is ambiguous.
/// `non_acgtn` counts every base outside A/C/G/T/N, so it also includes the
/// S, W and U folded into the GC and AT classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseComposition {
    pub gc: u64,
    pub at: u64,
    pub n: u64,
    pub ambiguous: u64,
    pub non_acgtn: u64,
}

impl BaseComposition {
    pub fn from_bases(bases: &[u8]) -> Self {
        let mut comp = Self::default();
        for &base in bases {
            comp.add(base);
        }
        comp
    }

    #[inline]
    fn add(&mut self, base: u8) {
        let base = base.to_ascii_uppercase();
        match base {
            b'G' | b'C' | b'S' => self.gc += 1,
            b'A' | b'T' | b'U' | b'W' => self.at += 1,
            b'N' => self.n += 1,
            _ => self.ambiguous += 1,
        }
        if !matches!(base, b'A' | b'C' | b'G' | b'T' | b'N') {
            self.non_acgtn += 1;
        }
    }

    /// Bases that resolve to either GC or AT
    pub fn resolved(&self) -> u64 {
        self.gc + self.at
    }
}

/// Summed quality information of a record that carried scores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualitySums {
    pub score: u64,
    pub error_probability: f64,
}

/// Per-record values derived in a single pass over the bases and qualities.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMetrics {
    pub length: usize,
    pub composition: BaseComposition,
    pub quality: Option<QualitySums>,
}

impl RecordMetrics {
    /// Computes the metrics of `sequence`.
    ///
    /// Fails when a quality character decodes to a score outside `[0, 200]`;
    /// the error names the offending record.
    pub fn from_sequence(sequence: &Sequence) -> Result<Self> {
        let composition = BaseComposition::from_bases(&sequence.data);

        let quality = match &sequence.quality {
            Some(qual) => {
                let mut sums = QualitySums::default();
                for &ascii in qual {
                    let q = decode_phred33(ascii);
                    let p = error_probability(q).map_err(|source| PipelineError::Quality {
                        record: sequence.id.clone(),
                        source,
                    })?;
                    sums.score += q as u64;
                    sums.error_probability += p;
                }
                Some(sums)
            }
            None => None,
        };

        Ok(Self {
            length: sequence.data.len(),
            composition,
            quality,
        })
    }

    /// GC fraction over bases that are neither N nor ambiguous.
    pub fn gc_ratio(&self) -> Option<f64> {
        ratio(self.composition.gc, self.composition.resolved())
    }

    pub fn mean_quality(&self) -> Option<f64> {
        self.quality.and_then(|q| ratio(q.score, self.length as u64))
    }

    pub fn mean_error_probability(&self) -> Option<f64> {
        match self.quality {
            Some(q) if self.length > 0 => Some(q.error_probability / self.length as f64),
            _ => None,
        }
    }
}

/// `num / den`, undefined for a zero denominator
pub(crate) fn ratio(num: u64, den: u64) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}
