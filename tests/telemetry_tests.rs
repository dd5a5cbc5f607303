use submission_stats::telemetry::{DEFAULT_FILTER, init_default_tracing, init_tracing};

#[test]
fn global_subscriber_is_installed_at_most_once() {
    let _ = init_default_tracing();
    assert!(!init_tracing("submission_stats=trace"));
    assert!(!init_default_tracing());
}

#[test]
fn default_filter_targets_this_crate() {
    assert!(DEFAULT_FILTER.starts_with("submission_stats="));
}
