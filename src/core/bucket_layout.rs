use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{StatsError, StatsResult};

/// Labelling style for histogram buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinMode {
    /// Real-valued data: each bucket is labelled with its `start to end` span.
    Continuous,
    /// Integer data: each bucket is labelled with a single representative value.
    Discrete,
}

/// Bucket boundaries resolved once per histogram.
///
/// The same layout drives both sample counting and label generation, so a
/// label can never describe a different span than the count next to it.
///
/// Invariants:
/// - `min` and `max` are finite and `min <= max`
/// - `width` is integral and `>= 1`
/// - `count >= 1` and `count * width >= max - min`
/// - bucket `i < count - 1` covers `[min + i*width, min + (i+1)*width)`
/// - the last bucket covers `[min + (count-1)*width, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketLayout {
    min: f64,
    max: f64,
    width: f64,
    count: usize,
}

impl BucketLayout {
    /// Resolves bucket width and effective bucket count for an explicit range.
    ///
    /// The effective count may differ from `requested_buckets`: it is clamped
    /// to the number of integer positions in the range, and grown until the
    /// buckets reach `max`.
    pub fn resolve(requested_buckets: usize, min: f64, max: f64) -> StatsResult<Self> {
        if requested_buckets == 0 {
            return Err(StatsError::InvalidArgument(
                "requested bucket count must be > 0".to_owned(),
            ));
        }

        if !min.is_finite() || !max.is_finite() || max < min {
            return Err(StatsError::InvalidRange { min, max });
        }

        let range = max - min;
        if !range.is_finite() {
            return Err(StatsError::InvalidRange { min, max });
        }
        let width = (range / requested_buckets as f64).floor().max(1.0);

        let mut count = requested_buckets;
        if count as f64 > range {
            count = range.ceil() as usize;
        }
        if count == 0 {
            count = 1;
        }
        // `width` was floored, so the requested count may stop short of `max`.
        while (count as f64) * width < range {
            count += 1;
        }

        trace!(
            requested_buckets,
            min,
            max,
            width,
            count,
            "resolved bucket layout"
        );

        Ok(Self {
            min,
            max,
            width,
            count,
        })
    }

    /// Resolves a layout, deriving any omitted bound from the samples.
    pub fn from_samples(
        samples: &[f64],
        requested_buckets: usize,
        min: Option<f64>,
        max: Option<f64>,
    ) -> StatsResult<Self> {
        let min = match min {
            Some(min) => min,
            None => sample_min(samples).ok_or(StatsError::EmptyInput)?,
        };
        let max = match max {
            Some(max) => max,
            None => sample_max(samples).ok_or(StatsError::EmptyInput)?,
        };
        Self::resolve(requested_buckets, min, max)
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    /// Integral bucket width, always `>= 1`.
    #[must_use]
    pub fn width(self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// Lower bound of bucket `index`.
    #[must_use]
    pub fn bucket_start(self, index: usize) -> f64 {
        self.min + index as f64 * self.width
    }

    /// Upper bound of bucket `index`; the last bucket ends at `max`.
    #[must_use]
    pub fn bucket_end(self, index: usize) -> f64 {
        if index + 1 >= self.count {
            self.max
        } else {
            self.min + (index + 1) as f64 * self.width
        }
    }

    /// Returns `true` when `value` falls into bucket `index`.
    #[must_use]
    pub fn bucket_contains(self, index: usize, value: f64) -> bool {
        if index >= self.count {
            return false;
        }
        let start = self.bucket_start(index);
        let end = self.bucket_end(index);
        if index + 1 == self.count {
            value >= start && value <= end
        } else {
            value >= start && value < end
        }
    }

    /// Maps a sample onto its bucket index.
    ///
    /// Samples outside `[min, max]` (including NaN) are rejected; callers are
    /// expected to pre-filter.
    pub fn bucket_index(self, value: f64) -> StatsResult<usize> {
        if !(value >= self.min && value <= self.max) {
            return Err(StatsError::SampleOutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }

        let last = self.count - 1;
        let mut index = (((value - self.min) / self.width).floor() as usize).min(last);
        // Division and `bucket_start` round differently for fractional `min`;
        // the boundaries used for labels decide.
        while index < last && value >= self.bucket_start(index + 1) {
            index += 1;
        }
        while index > 0 && value < self.bucket_start(index) {
            index -= 1;
        }
        Ok(index)
    }
}

pub(crate) fn sample_min(samples: &[f64]) -> Option<f64> {
    samples
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .reduce(f64::min)
}

pub(crate) fn sample_max(samples: &[f64]) -> Option<f64> {
    samples
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .reduce(f64::max)
}
