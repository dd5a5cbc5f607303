use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

use super::ChartKind;

const DEFAULT_MIN_GRADE: f64 = 0.0;
const DEFAULT_MAX_GRADE: f64 = 100.0;

/// Flat form state submitted by the dashboard.
///
/// Every field is the raw form value; an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartQuery {
    pub chart_type: String,
    pub submissions_filter: String,
    pub min_submission_grade: String,
    pub max_submission_grade: String,
    pub stats_from: String,
    pub stats_to: String,
    pub filter_tags: String,
    pub filter_exercises: String,
}

impl ChartQuery {
    #[must_use]
    pub fn for_chart(kind: ChartKind) -> Self {
        Self {
            chart_type: kind.as_str().to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_grade_bounds(mut self, min: &str, max: &str) -> Self {
        self.min_submission_grade = min.to_owned();
        self.max_submission_grade = max.to_owned();
        self
    }

    #[must_use]
    pub fn with_submissions_filter(mut self, filter: SubmissionsFilter) -> Self {
        self.submissions_filter = filter.as_str().to_owned();
        self
    }

    #[must_use]
    pub fn with_date_range(mut self, from: &str, to: &str) -> Self {
        self.stats_from = from.to_owned();
        self.stats_to = to.to_owned();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.filter_tags = tags.to_owned();
        self
    }

    #[must_use]
    pub fn with_exercises(mut self, exercises: &str) -> Self {
        self.filter_exercises = exercises.to_owned();
        self
    }

    pub fn from_json_str(input: &str) -> StatsResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| StatsError::InvalidData(format!("failed to parse chart query: {e}")))
    }

    /// Validates the form values and converts them into typed filters.
    pub fn parse(&self) -> StatsResult<ParsedQuery> {
        let chart_kind = self.chart_type.parse::<ChartKind>()?;
        let submissions_filter = self.submissions_filter.parse::<SubmissionsFilter>()?;

        let from = parse_date_bound("stats_from", &self.stats_from)?;
        let to = parse_date_bound("stats_to", &self.stats_to)?;
        let date_range = DateRange::new(from, to)?;

        let min = parse_grade_bound("min_submission_grade", &self.min_submission_grade)?
            .unwrap_or(DEFAULT_MIN_GRADE);
        let max = parse_grade_bound("max_submission_grade", &self.max_submission_grade)?
            .unwrap_or(DEFAULT_MAX_GRADE);
        let grade_bounds = GradeBounds::new(min, max)?;

        Ok(ParsedQuery {
            chart_kind,
            submissions_filter,
            date_range,
            grade_bounds,
            exercises: split_list(&self.filter_exercises),
            tags: split_list(&self.filter_tags),
        })
    }
}

/// Typed view of a [`ChartQuery`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub chart_kind: ChartKind,
    pub submissions_filter: SubmissionsFilter,
    pub date_range: DateRange,
    pub grade_bounds: GradeBounds,
    /// Exercise names; empty selects every exercise.
    pub exercises: Vec<String>,
    /// Tags; empty selects every tag.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionsFilter {
    #[default]
    All,
    /// Only the best submission per student and task.
    Best,
}

impl SubmissionsFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Best => "best",
        }
    }
}

impl FromStr for SubmissionsFilter {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "all" => Ok(Self::All),
            "best" => Ok(Self::Best),
            other => Err(StatsError::InvalidData(format!(
                "unknown submissions filter: `{other}`"
            ))),
        }
    }
}

/// Half-open submission time window: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> StatsResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(StatsError::InvalidData(format!(
                    "date range start {from} is after end {to}"
                )));
            }
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start(self) -> Option<DateTime<Utc>> {
        self.from
    }

    #[must_use]
    pub fn end(self) -> Option<DateTime<Utc>> {
        self.to
    }

    #[must_use]
    pub fn contains(self, time: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| time >= from) && self.to.is_none_or(|to| time < to)
    }
}

/// Inclusive grade window, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeBounds {
    min: f64,
    max: f64,
}

impl Default for GradeBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_GRADE,
            max: DEFAULT_MAX_GRADE,
        }
    }
}

impl GradeBounds {
    pub fn new(min: f64, max: f64) -> StatsResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(StatsError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn as_tuple(self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, grade: f64) -> bool {
        grade >= self.min && grade <= self.max
    }
}

fn parse_grade_bound(field: &str, raw: &str) -> StatsResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let number = raw.strip_suffix('%').unwrap_or(raw).trim();
    let value: f64 = number.parse().map_err(|_| {
        StatsError::InvalidData(format!("`{field}` is not a number: `{raw}`"))
    })?;
    if !value.is_finite() {
        return Err(StatsError::InvalidData(format!(
            "`{field}` must be finite: `{raw}`"
        )));
    }
    Ok(Some(value))
}

fn parse_date_bound(field: &str, raw: &str) -> StatsResult<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(time.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(time.and_utc()));
        }
    }

    Err(StatsError::InvalidData(format!(
        "`{field}` is not a valid date: `{raw}`"
    )))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
