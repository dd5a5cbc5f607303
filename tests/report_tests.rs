use chrono::{TimeZone, Utc};
use submission_stats::api::{
    ChartKind, ChartQuery, DashboardConfig, StatisticsTable, Submission, SubmissionResult,
    build_report,
};

fn course() -> Vec<Submission> {
    let grades = [(10.0, false), (55.0, false), (100.0, true), (72.5, false), (100.0, true)];
    grades
        .iter()
        .enumerate()
        .map(|(i, &(grade, success))| Submission {
            username: format!("student{}", i % 2),
            task_id: "loops".to_owned(),
            task_name: "Loops".to_owned(),
            submitted_on: Utc
                .with_ymd_and_hms(2019, 10, 1 + i as u32 / 2, 10, i as u32, 0)
                .unwrap(),
            grade,
            result: if success {
                SubmissionResult::Success
            } else {
                SubmissionResult::Failed
            },
            tags: if success {
                Vec::new()
            } else {
                vec!["timeout".to_owned()]
            },
            line_count: Some(20 + i as u64),
        })
        .collect()
}

#[test]
fn grade_report_includes_chart_and_full_statistics() {
    let report = build_report(
        &ChartQuery::for_chart(ChartKind::GradesDistribution),
        &course(),
        &DashboardConfig::default(),
    )
    .expect("report");

    let chart = report.chart.chart().expect("chart");
    assert_eq!(chart.series().len(), 20);
    assert_eq!(chart.series().iter().sum::<u64>(), 5);

    match report.statistics {
        Some(StatisticsTable::Full(stats)) => {
            assert_eq!(stats.count, 5);
            assert_eq!(stats.max, 100.0);
            assert_eq!(stats.mode, 100.0);
        }
        other => panic!("unexpected statistics: {other:?}"),
    }
}

#[test]
fn grade_report_respects_query_bounds() {
    let query =
        ChartQuery::for_chart(ChartKind::GradesDistribution).with_grade_bounds("50%", "80%");
    let report = build_report(&query, &course(), &DashboardConfig::default()).expect("report");

    let chart = report.chart.chart().expect("chart");
    assert_eq!(chart.series().iter().sum::<u64>(), 2);
    // A 30-point window cannot be split into 20 integer-width buckets.
    assert_eq!(chart.series().len(), 30);
    assert_eq!(chart.labels()[0].to_string(), "50");
    assert_eq!(
        chart.labels().last().expect("label").to_string(),
        "79 to 80"
    );
}

#[test]
fn time_report_only_carries_extent_statistics() {
    let report = build_report(
        &ChartQuery::for_chart(ChartKind::SubmissionsTime),
        &course(),
        &DashboardConfig::default(),
    )
    .expect("report");

    assert_eq!(report.chart.chart().expect("chart").series(), &[2, 2, 1]);
    match report.statistics {
        Some(StatisticsTable::Extent(extent)) => {
            assert_eq!(extent.count, 3);
            assert_eq!(extent.min, 1.0);
            assert_eq!(extent.max, 2.0);
        }
        other => panic!("unexpected statistics: {other:?}"),
    }
}

#[test]
fn lines_report_without_line_counts_shows_nothing() {
    let mut course = course();
    for submission in &mut course {
        submission.line_count = None;
    }
    let report = build_report(
        &ChartQuery::for_chart(ChartKind::LinesPerSubmission),
        &course,
        &DashboardConfig::default(),
    )
    .expect("report");

    assert!(report.chart.is_empty());
    assert!(report.statistics.is_none());
}

#[test]
fn tag_report_breaks_down_failures() {
    let report = build_report(
        &ChartQuery::for_chart(ChartKind::TagSorted),
        &course(),
        &DashboardConfig::default(),
    )
    .expect("report");

    let chart = report.chart.chart().expect("chart");
    assert_eq!(chart.series(), &[3]);
    assert_eq!(chart.labels()[0].to_string(), "timeout");
    assert!(report.statistics.is_none());
}

#[test]
fn malformed_query_and_config_are_reported_as_errors() {
    let query = ChartQuery::for_chart(ChartKind::GradesDistribution).with_grade_bounds("x", "");
    assert!(build_report(&query, &course(), &DashboardConfig::default()).is_err());

    let config = DashboardConfig::default().with_grade_buckets(0);
    let query = ChartQuery::for_chart(ChartKind::GradesDistribution);
    assert!(build_report(&query, &course(), &config).is_err());
}

#[test]
fn report_serializes_to_json() {
    let report = build_report(
        &ChartQuery::for_chart(ChartKind::SubmissionBeforePerfect),
        &course(),
        &DashboardConfig::default(),
    )
    .expect("report");
    let json = report.to_json_pretty().expect("json");
    assert!(json.contains("\"chart_kind\": \"submission-before-perfect\""));
    assert!(json.contains("\"state\": \"chart\""));
}
