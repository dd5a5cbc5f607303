use chrono::{TimeZone, Utc};
use submission_stats::StatsError;
use submission_stats::api::{ChartKind, ChartQuery, GradeBounds, SubmissionsFilter};

#[test]
fn empty_query_fields_take_defaults() {
    let parsed = ChartQuery::for_chart(ChartKind::GradesDistribution)
        .parse()
        .expect("parse");

    assert_eq!(parsed.chart_kind, ChartKind::GradesDistribution);
    assert_eq!(parsed.submissions_filter, SubmissionsFilter::All);
    assert_eq!(parsed.grade_bounds, GradeBounds::default());
    assert_eq!(parsed.grade_bounds.as_tuple(), (0.0, 100.0));
    assert!(parsed.date_range.start().is_none());
    assert!(parsed.date_range.end().is_none());
    assert!(parsed.exercises.is_empty());
    assert!(parsed.tags.is_empty());
}

#[test]
fn grade_bounds_accept_percent_suffix() {
    let parsed = ChartQuery::for_chart(ChartKind::GradesDistribution)
        .with_grade_bounds("25%", " 75.5 % ")
        .parse()
        .expect("parse");
    assert_eq!(parsed.grade_bounds.as_tuple(), (25.0, 75.5));
}

#[test]
fn inverted_grade_bounds_are_rejected() {
    let err = ChartQuery::for_chart(ChartKind::GradesDistribution)
        .with_grade_bounds("80", "20")
        .parse()
        .expect_err("min > max");
    assert_eq!(err, StatsError::InvalidRange { min: 80.0, max: 20.0 });
}

#[test]
fn unknown_chart_type_is_rejected() {
    let query = ChartQuery {
        chart_type: "pie".to_owned(),
        ..ChartQuery::default()
    };
    let err = query.parse().expect_err("unknown chart");
    assert!(format!("{err}").contains("unknown chart type"));
}

#[test]
fn chart_kinds_round_trip_through_form_values() {
    for kind in ChartKind::ALL {
        assert_eq!(kind.as_str().parse::<ChartKind>().expect("parse"), kind);
        let json = serde_json::to_string(&kind).expect("json");
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
}

#[test]
fn lists_are_split_and_trimmed() {
    let parsed = ChartQuery::for_chart(ChartKind::TagSorted)
        .with_tags(" timeout, ,crash ")
        .with_exercises("Loops,Recursion ,")
        .parse()
        .expect("parse");
    assert_eq!(parsed.tags, vec!["timeout", "crash"]);
    assert_eq!(parsed.exercises, vec!["Loops", "Recursion"]);
}

#[test]
fn date_range_accepts_dates_and_timestamps() {
    let parsed = ChartQuery::for_chart(ChartKind::SubmissionsTime)
        .with_date_range("2019-10-01", "2019-10-08T12:30:00Z")
        .parse()
        .expect("parse");

    let start = Utc.with_ymd_and_hms(2019, 10, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2019, 10, 8, 12, 30, 0).unwrap();
    assert_eq!(parsed.date_range.start(), Some(start));
    assert_eq!(parsed.date_range.end(), Some(end));
    assert!(parsed.date_range.contains(start));
    assert!(!parsed.date_range.contains(end));
}

#[test]
fn inverted_or_malformed_dates_are_rejected() {
    let inverted = ChartQuery::for_chart(ChartKind::SubmissionsTime)
        .with_date_range("2019-10-08", "2019-10-01")
        .parse();
    assert!(matches!(inverted, Err(StatsError::InvalidData(_))));

    let malformed = ChartQuery::for_chart(ChartKind::SubmissionsTime)
        .with_date_range("yesterday", "")
        .parse();
    assert!(matches!(malformed, Err(StatsError::InvalidData(_))));
}

#[test]
fn submissions_filter_parses_best_and_rejects_unknown() {
    let parsed = ChartQuery::for_chart(ChartKind::GradesDistribution)
        .with_submissions_filter(SubmissionsFilter::Best)
        .parse()
        .expect("parse");
    assert_eq!(parsed.submissions_filter, SubmissionsFilter::Best);

    let query = ChartQuery {
        submissions_filter: "worst".to_owned(),
        ..ChartQuery::for_chart(ChartKind::GradesDistribution)
    };
    assert!(query.parse().is_err());
}

#[test]
fn query_deserializes_from_flat_mapping_with_missing_keys() {
    let query = ChartQuery::from_json_str(
        r#"{"chart_type":"submission-before-perfect","max_submission_grade":"90%"}"#,
    )
    .expect("json");
    let parsed = query.parse().expect("parse");
    assert_eq!(parsed.chart_kind, ChartKind::SubmissionBeforePerfect);
    assert_eq!(parsed.grade_bounds.as_tuple(), (0.0, 90.0));
}
