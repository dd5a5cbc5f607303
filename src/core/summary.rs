use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::bucket_layout::{sample_max, sample_min};

/// Count and extent of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

/// Descriptive statistics shown next to a chart.
///
/// Variance and standard deviation are population statistics. `mode` is the
/// smallest of the most frequent values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub std_deviation: f64,
}

/// Count, min and max only; used for temporal series where the remaining
/// statistics carry no meaning. Returns `None` for empty input.
#[must_use]
pub fn summarize_extent(samples: &[f64]) -> Option<ExtentSummary> {
    Some(ExtentSummary {
        count: samples.len(),
        min: sample_min(samples)?,
        max: sample_max(samples)?,
    })
}

/// Full descriptive statistics. NaN samples are ignored; returns `None`
/// when nothing remains.
#[must_use]
pub fn summarize(samples: &[f64]) -> Option<SummaryStatistics> {
    let mut sorted: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Some(SummaryStatistics {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean,
        median,
        mode: smallest_mode(&sorted),
        variance,
        std_deviation: variance.sqrt(),
    })
}

fn smallest_mode(samples: &[f64]) -> f64 {
    let mut frequencies: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for &value in samples {
        *frequencies.entry(OrderedFloat(value)).or_insert(0) += 1;
    }

    let mut best = (OrderedFloat(f64::NAN), 0_usize);
    // Ascending key order plus a strict comparison keeps the smallest value on ties.
    for (value, frequency) in frequencies {
        if frequency > best.1 {
            best = (value, frequency);
        }
    }
    best.0.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefers_smallest_on_ties() {
        assert_eq!(smallest_mode(&[1.0, 1.0, 3.0, 3.0, 2.0]), 1.0);
        assert_eq!(smallest_mode(&[4.0]), 4.0);
    }
}
