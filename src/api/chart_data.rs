use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{BucketLabel, bin, consecutive_labels, grouped_value_counts};
use crate::error::{StatsError, StatsResult};

use super::{
    ChartKind, DashboardConfig, GradeBounds, RangePolicy, RenderKind, SeriesPolicy, filter_grades,
};

/// Category-axis label handed to the charting widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartLabel {
    Bucket(BucketLabel),
    Text(String),
}

impl fmt::Display for ChartLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(label) => write!(f, "{label}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Data feeding one chart, shaped by the chart kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartInput {
    /// Raw numeric samples, binned into a histogram.
    Samples(Vec<f64>),
    /// Raw non-negative integer values, counted per value then grouped.
    Values(Vec<u64>),
    /// One count per day.
    Timeline(Vec<(NaiveDate, u64)>),
    /// One count per named category, in display order.
    Categories(IndexMap<String, u64>),
}

impl ChartInput {
    fn shape(&self) -> &'static str {
        match self {
            Self::Samples(_) => "samples",
            Self::Values(_) => "values",
            Self::Timeline(_) => "timeline",
            Self::Categories(_) => "categories",
        }
    }
}

/// `{labels, series}` payload consumed by the charting widget.
///
/// `labels[i]` always describes `series[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    kind: ChartKind,
    render: RenderKind,
    labels: Vec<ChartLabel>,
    series: Vec<u64>,
}

impl ChartData {
    fn new(
        kind: ChartKind,
        render: RenderKind,
        labels: Vec<ChartLabel>,
        series: Vec<u64>,
    ) -> Self {
        debug_assert_eq!(labels.len(), series.len());
        Self {
            kind,
            render,
            labels,
            series,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    #[must_use]
    pub fn render(&self) -> RenderKind {
        self.render
    }

    #[must_use]
    pub fn labels(&self) -> &[ChartLabel] {
        &self.labels
    }

    #[must_use]
    pub fn series(&self) -> &[u64] {
        &self.series
    }

    pub fn to_json_pretty(&self) -> StatsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StatsError::InvalidData(format!("failed to serialize chart data: {e}")))
    }
}

/// Builds labels and series for `kind` from `input`.
///
/// Histogram charts bound to the query grade window drop samples outside
/// `grade_bounds` before binning; other histogram charts reject samples
/// outside their range.
pub fn build_chart(
    kind: ChartKind,
    input: ChartInput,
    grade_bounds: GradeBounds,
    config: &DashboardConfig,
) -> StatsResult<ChartData> {
    let kind_config = kind.config(config);
    let render = kind_config.render;

    let chart = match (kind_config.series, input) {
        (
            SeriesPolicy::Histogram {
                mode,
                requested_buckets,
                range,
            },
            ChartInput::Samples(samples),
        ) => {
            let samples = match range {
                RangePolicy::QueryGradeBounds => filter_grades(&samples, grade_bounds),
                RangePolicy::FixedMin(_) | RangePolicy::DataExtent => samples,
            };
            let (min, max) = range.bounds(grade_bounds.as_tuple());
            let histogram = bin(&samples, requested_buckets, min, max)?;
            let labels = histogram
                .labels(mode)
                .into_iter()
                .map(ChartLabel::Bucket)
                .collect();
            ChartData::new(kind, render, labels, histogram.into_counts())
        }
        (SeriesPolicy::ConsecutiveGroups { max_groups }, ChartInput::Values(values)) => {
            let (first_value, layout, counts) =
                grouped_value_counts(&values, max_groups)?.ok_or(StatsError::EmptyInput)?;
            let labels = consecutive_labels(first_value, &layout)
                .into_iter()
                .map(ChartLabel::Bucket)
                .collect();
            ChartData::new(kind, render, labels, counts)
        }
        (SeriesPolicy::Timeline, ChartInput::Timeline(points)) => {
            if points.is_empty() {
                return Err(StatsError::EmptyInput);
            }
            let (labels, series): (Vec<ChartLabel>, Vec<u64>) = points
                .into_iter()
                .map(|(day, count)| (ChartLabel::Text(day.to_string()), count))
                .unzip();
            ChartData::new(kind, render, labels, series)
        }
        (SeriesPolicy::Categories, ChartInput::Categories(categories)) => {
            if categories.is_empty() {
                return Err(StatsError::EmptyInput);
            }
            let (labels, series): (Vec<ChartLabel>, Vec<u64>) = categories
                .into_iter()
                .map(|(name, count)| (ChartLabel::Text(name), count))
                .unzip();
            ChartData::new(kind, render, labels, series)
        }
        (_, input) => {
            return Err(StatsError::InvalidArgument(format!(
                "chart `{kind}` cannot be built from {} input",
                input.shape()
            )));
        }
    };

    debug!(kind = %kind, bars = chart.series.len(), "built chart");
    Ok(chart)
}

/// What the dashboard shows: a chart or an explicit "nothing to display".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ChartView {
    Chart(ChartData),
    Empty { reason: String },
}

impl ChartView {
    /// Turns a build failure into the empty state instead of surfacing it.
    #[must_use]
    pub fn from_result(result: StatsResult<ChartData>) -> Self {
        match result {
            Ok(chart) => Self::Chart(chart),
            Err(err) => {
                warn!(error = %err, "nothing to display");
                Self::Empty {
                    reason: err.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    #[must_use]
    pub fn chart(&self) -> Option<&ChartData> {
        match self {
            Self::Chart(chart) => Some(chart),
            Self::Empty { .. } => None,
        }
    }
}
