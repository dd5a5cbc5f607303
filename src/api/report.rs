use serde::Serialize;
use tracing::debug;

use crate::core::{ExtentSummary, SummaryStatistics, summarize, summarize_extent};
use crate::error::{StatsError, StatsResult};

use super::{
    ChartInput, ChartKind, ChartQuery, ChartView, DashboardConfig, ParsedQuery,
    Submission, attempts_before_success, build_chart, failure_breakdown, grade_samples,
    line_counts, select_submissions, submissions_per_day,
};

/// Statistics table shown beside the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatisticsTable {
    Full(SummaryStatistics),
    /// Temporal charts only report count and extent.
    Extent(ExtentSummary),
}

/// Everything the dashboard renders for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub query: ParsedQuery,
    pub chart: ChartView,
    pub statistics: Option<StatisticsTable>,
}

impl ChartReport {
    pub fn to_json_pretty(&self) -> StatsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StatsError::InvalidData(format!("failed to serialize chart report: {e}")))
    }
}

/// Runs one dashboard query against `submissions`.
///
/// Malformed queries and configs are returned as errors so the form can
/// report them. Once the query is valid, any failure to build the chart
/// becomes [`ChartView::Empty`].
pub fn build_report(
    query: &ChartQuery,
    submissions: &[Submission],
    config: &DashboardConfig,
) -> StatsResult<ChartReport> {
    let config = config.validate()?;
    let parsed = query.parse()?;
    let selected = select_submissions(submissions, &parsed);
    let bounds = parsed.grade_bounds;

    let (input, statistics) = match parsed.chart_kind {
        ChartKind::GradesDistribution => {
            let grades = grade_samples(&selected, parsed.submissions_filter, bounds);
            let statistics = summarize(&grades).map(StatisticsTable::Full);
            (ChartInput::Samples(grades), statistics)
        }
        ChartKind::SubmissionBeforePerfect => {
            let attempts = attempts_before_success(&selected, bounds);
            let statistics = summarize(&attempts).map(StatisticsTable::Full);
            (ChartInput::Samples(attempts), statistics)
        }
        ChartKind::LinesPerSubmission => {
            let lines = line_counts(&selected);
            let as_samples: Vec<f64> = lines.iter().map(|&value| value as f64).collect();
            let statistics = summarize(&as_samples).map(StatisticsTable::Full);
            (ChartInput::Values(lines), statistics)
        }
        ChartKind::SubmissionsTime => {
            let per_day = submissions_per_day(&selected);
            let counts: Vec<f64> = per_day.iter().map(|&(_, count)| count as f64).collect();
            let statistics = summarize_extent(&counts).map(StatisticsTable::Extent);
            (ChartInput::Timeline(per_day), statistics)
        }
        ChartKind::TagSorted => (ChartInput::Categories(failure_breakdown(&selected)), None),
    };

    let chart = ChartView::from_result(build_chart(parsed.chart_kind, input, bounds, &config));
    debug!(
        kind = %parsed.chart_kind,
        selected = selected.len(),
        empty = chart.is_empty(),
        "built chart report"
    );

    Ok(ChartReport {
        query: parsed,
        chart,
        statistics,
    })
}
