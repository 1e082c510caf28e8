#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use asc_analytics_query::{QueryBuilder, QuerySettings};
use chrono::NaiveDate;

pub const APP_ID: &str = "1234567890";

static INIT: Once = Once::new();

/// Route builder logs to the test harness; enable with RUST_LOG=debug
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builder for the test app with default settings
pub fn builder() -> QueryBuilder {
    init_test_logging();
    QueryBuilder::new(APP_ID)
}

pub fn builder_with(settings: QuerySettings) -> QueryBuilder {
    init_test_logging();
    QueryBuilder::with_settings(APP_ID, settings)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

/// Top-level keys of the payload the builder would send
pub fn payload_keys(query: &QueryBuilder) -> BTreeSet<String> {
    query
        .payload()
        .expect("payload")
        .as_object()
        .expect("payload is an object")
        .keys()
        .cloned()
        .collect()
}

pub fn keys(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}
