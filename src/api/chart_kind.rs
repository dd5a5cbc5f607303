use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::BinMode;
use crate::error::StatsError;

use super::DashboardConfig;

/// Charts offered by the statistics dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    GradesDistribution,
    SubmissionBeforePerfect,
    LinesPerSubmission,
    SubmissionsTime,
    TagSorted,
}

impl ChartKind {
    pub const ALL: [Self; 5] = [
        Self::GradesDistribution,
        Self::SubmissionBeforePerfect,
        Self::LinesPerSubmission,
        Self::SubmissionsTime,
        Self::TagSorted,
    ];

    /// Form value used by the query layer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GradesDistribution => "grades-distribution",
            Self::SubmissionBeforePerfect => "submission-before-perfect",
            Self::LinesPerSubmission => "lines-per-submission",
            Self::SubmissionsTime => "submissions-time",
            Self::TagSorted => "tag-sorted",
        }
    }

    /// Resolves how this chart turns its input into labels and series.
    #[must_use]
    pub fn config(self, dashboard: &DashboardConfig) -> ChartKindConfig {
        match self {
            Self::GradesDistribution => ChartKindConfig {
                render: RenderKind::Bar,
                series: SeriesPolicy::Histogram {
                    mode: BinMode::Continuous,
                    requested_buckets: dashboard.grade_buckets,
                    range: RangePolicy::QueryGradeBounds,
                },
            },
            Self::SubmissionBeforePerfect => ChartKindConfig {
                render: RenderKind::Bar,
                series: SeriesPolicy::Histogram {
                    mode: BinMode::Discrete,
                    requested_buckets: dashboard.attempt_buckets,
                    range: RangePolicy::FixedMin(f64::from(dashboard.attempts_min)),
                },
            },
            Self::LinesPerSubmission => ChartKindConfig {
                render: RenderKind::Bar,
                series: SeriesPolicy::ConsecutiveGroups {
                    max_groups: dashboard.max_groups,
                },
            },
            Self::SubmissionsTime => ChartKindConfig {
                render: RenderKind::Line,
                series: SeriesPolicy::Timeline,
            },
            Self::TagSorted => ChartKindConfig {
                render: RenderKind::Bar,
                series: SeriesPolicy::Categories,
            },
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| StatsError::InvalidData(format!("unknown chart type: `{value}`")))
    }
}

/// How the charting widget draws the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    Bar,
    Line,
}

/// Where a histogram takes its value range from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePolicy {
    /// Grade bounds from the query; meaningful even without data.
    QueryGradeBounds,
    /// Fixed lower bound, upper bound taken from the samples.
    FixedMin(f64),
    /// Both bounds taken from the samples.
    DataExtent,
}

impl RangePolicy {
    /// Explicit `(min, max)` to hand to the binner; `None` means derive.
    #[must_use]
    pub fn bounds(self, grade_bounds: (f64, f64)) -> (Option<f64>, Option<f64>) {
        match self {
            Self::QueryGradeBounds => (Some(grade_bounds.0), Some(grade_bounds.1)),
            Self::FixedMin(min) => (Some(min), None),
            Self::DataExtent => (None, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "policy")]
pub enum SeriesPolicy {
    /// Raw samples binned into a histogram.
    Histogram {
        mode: BinMode,
        requested_buckets: usize,
        range: RangePolicy,
    },
    /// Per-integer counts merged into at most `max_groups` bars.
    ConsecutiveGroups { max_groups: usize },
    /// One point per day.
    Timeline,
    /// One bar per named category.
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartKindConfig {
    pub render: RenderKind,
    pub series: SeriesPolicy,
}
