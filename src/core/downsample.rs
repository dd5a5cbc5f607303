use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::core::labels::BucketLabel;
use crate::error::{StatsError, StatsResult};

/// Display ceiling for per-value bar charts.
pub const DEFAULT_MAX_GROUPS: usize = 200;

/// Largest `max - min + 1` span [`counts_per_value`] expands into a dense vector.
pub const MAX_VALUE_SPAN: usize = 1 << 20;

/// Partition of a per-value count sequence into consecutive groups.
///
/// When `source_len <= max_groups` every source entry is its own group.
/// Otherwise `group_size = source_len / max_groups` and there are exactly
/// `max_groups` groups; the last one absorbs the remaining entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupLayout {
    source_len: usize,
    group_size: usize,
    group_count: usize,
}

impl GroupLayout {
    pub fn resolve(source_len: usize, max_groups: usize) -> StatsResult<Self> {
        if max_groups == 0 {
            return Err(StatsError::InvalidArgument(
                "max group count must be > 0".to_owned(),
            ));
        }

        if source_len <= max_groups {
            return Ok(Self {
                source_len,
                group_size: 1,
                group_count: source_len,
            });
        }

        Ok(Self {
            source_len,
            group_size: source_len / max_groups,
            group_count: max_groups,
        })
    }

    #[must_use]
    pub fn source_len(self) -> usize {
        self.source_len
    }

    /// Merge factor applied to every group but the last.
    #[must_use]
    pub fn group_size(self) -> usize {
        self.group_size
    }

    #[must_use]
    pub fn group_count(self) -> usize {
        self.group_count
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self.group_size == 1 && self.group_count == self.source_len
    }

    /// Source indices merged into group `index`.
    #[must_use]
    pub fn group_span(self, index: usize) -> Option<Range<usize>> {
        if index >= self.group_count {
            return None;
        }
        let start = index * self.group_size;
        let end = if index + 1 == self.group_count {
            self.source_len
        } else {
            start + self.group_size
        };
        Some(start..end)
    }

    /// Group holding source entry `offset`, or `None` past the end.
    #[must_use]
    pub fn group_of(self, offset: usize) -> Option<usize> {
        if offset >= self.source_len {
            return None;
        }
        Some((offset / self.group_size).min(self.group_count - 1))
    }

    /// Sums `counts` group by group.
    pub fn apply(self, counts: &[u64]) -> StatsResult<Vec<u64>> {
        if counts.len() != self.source_len {
            return Err(StatsError::InvalidArgument(format!(
                "group layout expects {} entries, got {}",
                self.source_len,
                counts.len()
            )));
        }

        Ok((0..self.group_count)
            .filter_map(|index| self.group_span(index))
            .map(|span| counts[span].iter().sum())
            .collect())
    }
}

/// Merges consecutive per-value counts so at most `max_groups` remain.
///
/// Returns the input unchanged when it already fits. The sum of all counts
/// is preserved.
pub fn downsample(counts: &[u64], max_groups: usize) -> StatsResult<Vec<u64>> {
    let layout = GroupLayout::resolve(counts.len(), max_groups)?;
    if layout.is_identity() {
        return Ok(counts.to_vec());
    }

    debug!(
        source_len = counts.len(),
        group_size = layout.group_size(),
        group_count = layout.group_count(),
        "downsampled per-value counts"
    );
    layout.apply(counts)
}

/// Labels for grouped per-value counts whose first entry counts `first_value`.
///
/// Each label names the inclusive integer span merged into its group, or the
/// single value when the group holds one integer.
#[must_use]
pub fn consecutive_labels(first_value: u64, layout: &GroupLayout) -> Vec<BucketLabel> {
    (0..layout.group_count())
        .filter_map(|index| layout.group_span(index))
        .map(|span| {
            let start = first_value + span.start as u64;
            let end = first_value + (span.end - 1) as u64;
            if start == end {
                BucketLabel::Value(start as f64)
            } else {
                BucketLabel::Range {
                    start: start as f64,
                    end: end as f64,
                }
            }
        })
        .collect()
}

/// Counts occurrences of every integer between the smallest and largest value.
///
/// Returns the smallest value and one count per integer in
/// `min..=max`, or `None` for empty input. Spans wider than
/// [`MAX_VALUE_SPAN`] are rejected with `InvalidData`; use
/// [`grouped_value_counts`] for unbounded data.
pub fn counts_per_value(values: &[u64]) -> StatsResult<Option<(u64, Vec<u64>)>> {
    let Some((min, span)) = value_span(values)? else {
        return Ok(None);
    };
    if span > MAX_VALUE_SPAN {
        return Err(StatsError::InvalidData(format!(
            "value span {span} exceeds {MAX_VALUE_SPAN} entries"
        )));
    }

    let mut counts = vec![0_u64; span];
    for &value in values {
        counts[(value - min) as usize] += 1;
    }
    Ok(Some((min, counts)))
}

/// Counts values straight into the consecutive groups of a per-value layout.
///
/// Equivalent to `counts_per_value` followed by [`GroupLayout::apply`], but
/// memory stays proportional to `max_groups` whatever the value span.
pub fn grouped_value_counts(
    values: &[u64],
    max_groups: usize,
) -> StatsResult<Option<(u64, GroupLayout, Vec<u64>)>> {
    let Some((min, span)) = value_span(values)? else {
        return Ok(None);
    };
    let layout = GroupLayout::resolve(span, max_groups)?;

    let mut counts = vec![0_u64; layout.group_count()];
    for &value in values {
        let offset = usize::try_from(value - min)
            .map_err(|_| StatsError::InvalidData(format!("value {value} is out of span")))?;
        if let Some(group) = layout.group_of(offset) {
            counts[group] += 1;
        }
    }

    debug!(
        values = values.len(),
        span,
        group_count = layout.group_count(),
        "grouped per-value counts"
    );
    Ok(Some((min, layout, counts)))
}

// Smallest value and the number of integers in `min..=max`.
fn value_span(values: &[u64]) -> StatsResult<Option<(u64, usize)>> {
    let (Some(min), Some(max)) = (values.iter().copied().min(), values.iter().copied().max())
    else {
        return Ok(None);
    };
    let span = usize::try_from(max - min)
        .ok()
        .and_then(|distance| distance.checked_add(1))
        .ok_or_else(|| {
            StatsError::InvalidData(format!("value span {min}..={max} does not fit in memory"))
        })?;
    Ok(Some((min, span)))
}
