mod chart_data;
mod chart_kind;
mod chart_query;
mod config;
mod report;
mod submissions;

pub use chart_data::{ChartData, ChartInput, ChartLabel, ChartView, build_chart};
pub use chart_kind::{ChartKind, ChartKindConfig, RangePolicy, RenderKind, SeriesPolicy};
pub use chart_query::{ChartQuery, DateRange, GradeBounds, ParsedQuery, SubmissionsFilter};
pub use config::DashboardConfig;
pub use report::{ChartReport, StatisticsTable, build_report};
pub use submissions::{
    Submission, SubmissionResult, attempts_before_success, failure_breakdown, filter_grades,
    grade_samples, line_counts, select_submissions, submissions_per_day,
};
