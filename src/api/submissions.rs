use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GradeBounds, ParsedQuery, SubmissionsFilter};

/// Outcome reported by the grader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionResult {
    Success,
    Failed,
    Timeout,
    Overflow,
    Killed,
    Crash,
    Error,
}

impl SubmissionResult {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One graded submission of a student for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub username: String,
    pub task_id: String,
    pub task_name: String,
    pub submitted_on: DateTime<Utc>,
    /// Grade in percent.
    pub grade: f64,
    pub result: SubmissionResult,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Source line count, when the grader reports it.
    #[serde(default)]
    pub line_count: Option<u64>,
}

impl Submission {
    fn student_task_key(&self) -> (&str, &str) {
        (self.username.as_str(), self.task_id.as_str())
    }
}

/// Keeps submissions inside the query's date window, exercise list and tag
/// list, ordered by submission time.
///
/// Exercises match on trimmed task name or task id. A submission passes the
/// tag filter when it carries any requested tag.
#[must_use]
pub fn select_submissions<'a>(
    submissions: &'a [Submission],
    query: &ParsedQuery,
) -> Vec<&'a Submission> {
    let mut selected: Vec<&Submission> = submissions
        .iter()
        .filter(|submission| query.date_range.contains(submission.submitted_on))
        .filter(|submission| {
            query.exercises.is_empty()
                || query.exercises.iter().any(|exercise| {
                    exercise == submission.task_name.trim() || *exercise == submission.task_id
                })
        })
        .filter(|submission| {
            query.tags.is_empty() || submission.tags.iter().any(|tag| query.tags.contains(tag))
        })
        .collect();
    selected.sort_by_key(|submission| submission.submitted_on);

    debug!(
        total = submissions.len(),
        selected = selected.len(),
        "selected submissions"
    );
    selected
}

/// Drops grades outside `bounds`.
#[must_use]
pub fn filter_grades(grades: &[f64], bounds: GradeBounds) -> Vec<f64> {
    grades
        .iter()
        .copied()
        .filter(|grade| bounds.contains(*grade))
        .collect()
}

/// Grades to plot, restricted to `bounds`.
///
/// With [`SubmissionsFilter::Best`] only the highest grade per student and
/// task is kept.
#[must_use]
pub fn grade_samples(
    selected: &[&Submission],
    filter: SubmissionsFilter,
    bounds: GradeBounds,
) -> Vec<f64> {
    let grades: Vec<f64> = match filter {
        SubmissionsFilter::All => selected.iter().map(|submission| submission.grade).collect(),
        SubmissionsFilter::Best => {
            let mut best: IndexMap<(&str, &str), f64> = IndexMap::new();
            for submission in selected {
                let entry = best
                    .entry(submission.student_task_key())
                    .or_insert(submission.grade);
                if submission.grade > *entry {
                    *entry = submission.grade;
                }
            }
            best.into_values().collect()
        }
    };
    filter_grades(&grades, bounds)
}

#[derive(Debug, Clone, Copy, Default)]
struct AttemptState {
    attempts: u64,
    done: bool,
}

/// Attempts each student made on each task before their first success.
///
/// Submissions are walked in the given order. Only submissions whose grade
/// lies in `bounds` count as attempts; the successful submission itself is
/// not counted. Students who never succeed report every in-bounds attempt.
#[must_use]
pub fn attempts_before_success(selected: &[&Submission], bounds: GradeBounds) -> Vec<f64> {
    let mut states: IndexMap<(&str, &str), AttemptState> = IndexMap::new();
    for submission in selected {
        let state = states.entry(submission.student_task_key()).or_default();
        if submission.result.is_success() {
            state.done = true;
        }
        if !bounds.contains(submission.grade) {
            continue;
        }
        if !state.done {
            state.attempts += 1;
        }
    }

    states
        .into_values()
        .map(|state| state.attempts as f64)
        .collect()
}

/// Number of submissions per UTC day, in ascending date order.
#[must_use]
pub fn submissions_per_day(selected: &[&Submission]) -> Vec<(NaiveDate, u64)> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for submission in selected {
        *per_day.entry(submission.submitted_on.date_naive()).or_insert(0) += 1;
    }
    per_day.into_iter().collect()
}

/// Reported line counts; submissions without one are skipped.
#[must_use]
pub fn line_counts(selected: &[&Submission]) -> Vec<u64> {
    selected
        .iter()
        .filter_map(|submission| submission.line_count)
        .collect()
}

/// Non-successful submissions per tag, in first-seen tag order.
#[must_use]
pub fn failure_breakdown(selected: &[&Submission]) -> IndexMap<String, u64> {
    let mut breakdown: IndexMap<String, u64> = IndexMap::new();
    for submission in selected {
        if submission.result.is_success() {
            continue;
        }
        for tag in &submission.tags {
            if tag.is_empty() {
                continue;
            }
            *breakdown.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    breakdown
}
