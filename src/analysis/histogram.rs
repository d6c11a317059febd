//! Travel histogram binning.

use serde::Serialize;

use crate::normalize::Normalizer;
use crate::parsers::types::RawReading;

/// Lower edge of the travel domain (percent)
pub const DOMAIN_MIN: f64 = 0.0;
/// Upper edge of the travel domain (percent)
pub const DOMAIN_MAX: f64 = 100.0;

/// One fixed-width travel bin. `[x0, x1)`, except the last bin which
/// includes `x1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
    /// `round(count / total * 100)`
    pub percent: f64,
}

/// What happened to the values fed to the binner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HistogramSummary {
    /// Finite normalized values (the percentage denominator)
    pub total: usize,
    /// Values dropped for being NaN or infinite
    pub non_finite: usize,
    /// Finite values outside `[0, 100]`, not counted in any bin
    pub out_of_domain: usize,
}

impl HistogramSummary {
    pub fn binned(&self) -> usize {
        self.total - self.out_of_domain
    }
}

/// Bin edges for `bin_count` equal bins over the travel domain
pub fn thresholds(bin_count: usize) -> Vec<f64> {
    let bin_count = bin_count.max(1);
    let width = (DOMAIN_MAX - DOMAIN_MIN) / bin_count as f64;
    (0..=bin_count)
        .map(|i| {
            if i == bin_count {
                DOMAIN_MAX
            } else {
                DOMAIN_MIN + i as f64 * width
            }
        })
        .collect()
}

/// Bin a channel's normalized travel.
///
/// Returns no bins when the channel has no finite values.
pub fn build_histogram(
    readings: &[RawReading],
    normalizer: &Normalizer,
    bin_count: usize,
) -> (Vec<HistogramBin>, HistogramSummary) {
    let edges = thresholds(bin_count);
    let last = edges.len() - 2;
    let mut counts = vec![0usize; edges.len() - 1];
    let mut summary = HistogramSummary::default();

    for reading in readings {
        let value = normalizer.normalize(reading.displacement());
        if !value.is_finite() {
            summary.non_finite += 1;
            continue;
        }
        summary.total += 1;

        if !(DOMAIN_MIN..=DOMAIN_MAX).contains(&value) {
            summary.out_of_domain += 1;
            continue;
        }

        // Index of the last edge <= value; the top edge belongs to the last bin
        let idx = edges.partition_point(|&edge| edge <= value).saturating_sub(1);
        counts[idx.min(last)] += 1;
    }

    if summary.non_finite > 0 || summary.out_of_domain > 0 {
        tracing::debug!(
            "Histogram dropped {} non-finite and {} out-of-domain values",
            summary.non_finite,
            summary.out_of_domain
        );
    }

    if summary.total == 0 {
        return (vec![], summary);
    }

    let total = summary.total as f64;
    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            x0: edges[i],
            x1: edges[i + 1],
            count,
            percent: (count as f64 / total * 100.0).round(),
        })
        .collect();

    (bins, summary)
}
