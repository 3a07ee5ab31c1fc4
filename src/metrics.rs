//! Prometheus counters exposed on /metrics

use axum::http::StatusCode;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    static ref SELECTIONS_ADDED: IntCounter = register_int_counter!(
        "music_selections_added_total",
        "Music selections stored through POST /add_music_selection"
    )
    .unwrap();

    static ref SEARCHES: IntCounterVec = register_int_counter_vec!(
        "searches_total",
        "Searches served, by cache outcome",
        &["cache"]
    )
    .unwrap();

    static ref HTTP_ERRORS: IntCounterVec = register_int_counter_vec!(
        "http_errors_total",
        "Error responses, by status code",
        &["status"]
    )
    .unwrap();
}

/// Outcome of a search cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Disabled,
}

impl CacheOutcome {
    fn as_label(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Disabled => "disabled",
        }
    }
}

pub fn record_selection_added() {
    SELECTIONS_ADDED.inc();
}

pub fn record_search(outcome: CacheOutcome) {
    SEARCHES.with_label_values(&[outcome.as_label()]).inc();
}

pub fn record_error(status: StatusCode) {
    HTTP_ERRORS.with_label_values(&[status.as_str()]).inc();
}
