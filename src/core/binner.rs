use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel-binning")]
use rayon::prelude::*;

use crate::core::bucket_layout::{BinMode, BucketLayout};
use crate::core::labels::{BucketLabel, bucket_labels};
use crate::error::StatsResult;

/// Bucket counts together with the layout that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    layout: BucketLayout,
    counts: Vec<u64>,
}

impl Histogram {
    #[must_use]
    pub fn layout(&self) -> BucketLayout {
        self.layout
    }

    /// One count per bucket, in ascending bucket order.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[must_use]
    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }

    /// Number of samples that landed in any bucket.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Labels for every bucket, generated from this histogram's own layout.
    #[must_use]
    pub fn labels(&self, mode: BinMode) -> Vec<BucketLabel> {
        bucket_labels(&self.layout, mode)
    }
}

/// Counts samples into buckets.
///
/// `min`/`max` default to the sample extent when omitted. Fails with
/// `EmptyInput` if a bound must be derived from an empty sample set, and with
/// `SampleOutOfRange` if any sample lies outside `[min, max]`.
pub fn bin(
    samples: &[f64],
    requested_buckets: usize,
    min: Option<f64>,
    max: Option<f64>,
) -> StatsResult<Histogram> {
    let layout = BucketLayout::from_samples(samples, requested_buckets, min, max)?;
    bin_with_layout(samples, layout)
}

/// Counts samples into the buckets of an already resolved layout.
pub fn bin_with_layout(samples: &[f64], layout: BucketLayout) -> StatsResult<Histogram> {
    let counts = count_samples(samples, layout)?;
    debug!(
        samples = samples.len(),
        buckets = layout.count(),
        width = layout.width(),
        "binned samples"
    );
    Ok(Histogram { layout, counts })
}

fn count_samples(samples: &[f64], layout: BucketLayout) -> StatsResult<Vec<u64>> {
    let bucket_count = layout.count();

    #[cfg(feature = "parallel-binning")]
    {
        samples
            .par_iter()
            .try_fold(
                || vec![0_u64; bucket_count],
                |mut counts, &sample| -> StatsResult<Vec<u64>> {
                    counts[layout.bucket_index(sample)?] += 1;
                    Ok(counts)
                },
            )
            .try_reduce(
                || vec![0_u64; bucket_count],
                |mut left, right| -> StatsResult<Vec<u64>> {
                    for (total, partial) in left.iter_mut().zip(right) {
                        *total += partial;
                    }
                    Ok(left)
                },
            )
    }

    #[cfg(not(feature = "parallel-binning"))]
    {
        let mut counts = vec![0_u64; bucket_count];
        for &sample in samples {
            counts[layout.bucket_index(sample)?] += 1;
        }
        Ok(counts)
    }
}
