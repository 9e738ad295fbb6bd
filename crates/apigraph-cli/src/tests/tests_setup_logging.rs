//! Tests for logging setup
//!
//! The global subscriber can only be installed once per process, so these
//! check the filter selection rather than calling `setup_logging`.

use crate::logging::default_filter;

#[test]
fn test_default_filter_info() {
    let filter = format!("{:?}", default_filter(false));
    assert!(filter.contains("INFO") || filter.contains("info"));
}

#[test]
fn test_default_filter_verbose_is_debug() {
    let filter = format!("{:?}", default_filter(true));
    assert!(filter.contains("DEBUG") || filter.contains("debug"));
}
