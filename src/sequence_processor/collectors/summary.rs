use super::base::Collector;
use crate::error::{PipelineError, Result};
use crate::sequence_processor::core::metrics::ratio;
use crate::sequence_processor::core::RecordMetrics;
use crate::sequence_processor::processors::RecordInfo;
use crate::seqmath::{median, Nxx};
use serde::Serialize;
use std::io::{self, Write};

/// Percentiles reported when none are requested
pub const DEFAULT_NXX: [u8; 3] = [20, 50, 80];

const SEPARATOR: &str = "--------------------";
const LINE_WIDTH: usize = 40;

/// Running totals over every record folded so far.
#[derive(Debug, Clone, Default)]
pub struct RunningSummary {
    pub records: u64,
    pub bases: u64,
    pub gc: u64,
    pub at: u64,
    pub n: u64,
    pub ambiguous: u64,
    pub non_acgtn: u64,
    /// Records with qualities and a non-zero length
    pub quality_records: u64,
    pub quality_bases: u64,
    pub sum_base_quality: u64,
    pub sum_base_error_prob: f64,
    pub sum_mean_quality: f64,
    pub sum_mean_error_prob: f64,
    lengths: Vec<usize>,
}

impl RunningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, metrics: &RecordMetrics) {
        self.records += 1;
        self.bases += metrics.length as u64;
        self.gc += metrics.composition.gc;
        self.at += metrics.composition.at;
        self.n += metrics.composition.n;
        self.ambiguous += metrics.composition.ambiguous;
        self.non_acgtn += metrics.composition.non_acgtn;

        if let Some(q) = metrics.quality {
            self.quality_bases += metrics.length as u64;
            self.sum_base_quality += q.score;
            self.sum_base_error_prob += q.error_probability;
        }
        if let (Some(mean_q), Some(mean_err)) =
            (metrics.mean_quality(), metrics.mean_error_probability())
        {
            self.quality_records += 1;
            self.sum_mean_quality += mean_q;
            self.sum_mean_error_prob += mean_err;
        }

        self.lengths.push(metrics.length);
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Computes the order-dependent statistics and freezes the summary.
    pub fn into_report(mut self, percentiles: &[u8]) -> SummaryReport {
        self.lengths.sort_unstable();
        let nxx_table = Nxx::compute(&mut self.lengths, self.bases);
        let nxx = percentiles
            .iter()
            .map(|&percentile| NxxEntry {
                percentile,
                length: nxx_table.get(percentile),
            })
            .collect();

        let quality = (self.quality_bases > 0 || self.quality_records > 0).then(|| QualitySummary {
            per_sequence: QualityMeans {
                mean_phred: mean(self.sum_mean_quality, self.quality_records),
                mean_error_rate: mean(self.sum_mean_error_prob, self.quality_records),
            },
            per_base: QualityMeans {
                mean_phred: ratio(self.sum_base_quality, self.quality_bases),
                mean_error_rate: mean(self.sum_base_error_prob, self.quality_bases),
            },
        });

        SummaryReport {
            total_records: self.records,
            total_bases: self.bases,
            gc_percent: ratio(self.gc, self.bases).map(|r| r * 100.0),
            gc_percent_unambiguous: ratio(self.gc, self.gc + self.at).map(|r| r * 100.0),
            n_bases: self.n,
            ambiguous_bases: self.ambiguous,
            non_acgtn_bases: self.non_acgtn,
            shortest: self.lengths.first().copied(),
            longest: self.lengths.last().copied(),
            mean_length: ratio(self.bases, self.records),
            median_length: median(&self.lengths),
            nxx,
            quality,
        }
    }
}

fn mean(sum: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NxxEntry {
    pub percentile: u8,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityMeans {
    pub mean_phred: Option<f64>,
    pub mean_error_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualitySummary {
    pub per_sequence: QualityMeans,
    pub per_base: QualityMeans,
}

/// Final statistics over the whole stream. Undefined values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_records: u64,
    pub total_bases: u64,
    pub gc_percent: Option<f64>,
    pub gc_percent_unambiguous: Option<f64>,
    pub n_bases: u64,
    pub ambiguous_bases: u64,
    pub non_acgtn_bases: u64,
    pub shortest: Option<usize>,
    pub longest: Option<usize>,
    pub mean_length: Option<f64>,
    pub median_length: Option<f64>,
    pub nxx: Vec<NxxEntry>,
    pub quality: Option<QualitySummary>,
}

impl SummaryReport {
    /// Reported length for percentile `p`, if it was requested and is defined
    pub fn nxx(&self, p: u8) -> Option<usize> {
        self.nxx
            .iter()
            .find(|entry| entry.percentile == p)
            .and_then(|entry| entry.length)
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nSUMMARY\n{}", SEPARATOR)?;
        line(out, "Total Seqs (#):", self.total_records.to_string())?;
        line(out, "Total Length (bp):", self.total_bases.to_string())?;
        line(out, "Overall GC Content (%):", float(self.gc_percent, 2))?;
        line(out, "GC excl. N/ambig. (%):", float(self.gc_percent_unambiguous, 2))?;
        line(out, "N bases (#):", self.n_bases.to_string())?;
        line(out, "Non-ATGCN bases (#):", self.non_acgtn_bases.to_string())?;
        line(out, "Shortest (bp):", int(self.shortest))?;
        line(out, "Longest (bp):", int(self.longest))?;
        line(out, "Mean length (bp):", float(self.mean_length, 2))?;
        line(out, "Median length (bp):", float(self.median_length, 1))?;
        for entry in &self.nxx {
            line(out, &format!("N{} (bp):", entry.percentile), int(entry.length))?;
        }

        if let Some(quality) = &self.quality {
            for (title, means) in [("PER-SEQ", quality.per_sequence), ("PER-BASE", quality.per_base)] {
                writeln!(out, "\n{}\n{}", title, SEPARATOR)?;
                line(out, "Mean Phred quality score:", float(means.mean_phred, 2))?;
                line(out, "Mean error rate:", float(means.mean_error_rate, 4))?;
            }
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

fn line<W: Write>(out: &mut W, label: &str, value: String) -> io::Result<()> {
    let width = LINE_WIDTH.saturating_sub(label.len()).max(1);
    writeln!(out, "{}{:>width$}", label, value, width = width)
}

fn int(value: Option<usize>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| v.to_string())
}

fn float(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "NaN".to_string(),
    }
}

/// Writes the column header matching [`SummaryCollector`]'s per-record lines.
pub fn write_record_header<W: Write>(out: &mut W, with_quality: bool) -> io::Result<()> {
    if with_quality {
        writeln!(out, "accession\tlength\tgc-content\tmean quality\tmean P(error)")
    } else {
        writeln!(out, "accession\tlength\tgc-content")
    }
}

/// Folds [`RecordInfo`] results into a [`RunningSummary`], optionally
/// echoing one tab-separated line per record.
pub struct SummaryCollector<W: Write + Send> {
    summary: RunningSummary,
    percentiles: Vec<u8>,
    per_record: Option<W>,
}

impl<W: Write + Send> SummaryCollector<W> {
    pub fn new(percentiles: &[u8]) -> Result<Self> {
        if let Some(&p) = percentiles.iter().find(|&&p| !(1..=99).contains(&p)) {
            return Err(PipelineError::InvalidConfig(format!(
                "Nxx percentile {} is outside 1..=99",
                p
            )));
        }
        Ok(Self {
            summary: RunningSummary::new(),
            percentiles: percentiles.to_vec(),
            per_record: None,
        })
    }

    pub fn with_record_lines(mut self, out: W) -> Self {
        self.per_record = Some(out);
        self
    }

    fn write_record_line(out: &mut W, info: &RecordInfo) -> io::Result<()> {
        let m = &info.metrics;
        write!(
            out,
            "{}\t{}\t{}",
            info.id,
            m.length,
            float(m.gc_ratio().map(|r| r * 100.0), 2)
        )?;
        if m.quality.is_some() {
            write!(
                out,
                "\t{}\t{}",
                float(m.mean_quality(), 2),
                float(m.mean_error_probability(), 4)
            )?;
        }
        writeln!(out)
    }
}

impl<W: Write + Send> Collector for SummaryCollector<W> {
    type Item = RecordInfo;
    type Output = SummaryReport;

    fn collect(&mut self, info: RecordInfo) -> Result<()> {
        if let Some(out) = self.per_record.as_mut() {
            Self::write_record_line(out, &info)?;
        }
        self.summary.add(&info.metrics);
        Ok(())
    }

    fn finish(mut self) -> Result<SummaryReport> {
        if let Some(out) = self.per_record.as_mut() {
            out.flush()?;
        }
        Ok(self.summary.into_report(&self.percentiles))
    }
}
