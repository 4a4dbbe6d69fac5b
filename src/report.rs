//! Structured reporting of tool runs.
//!
//! Key/value pairs reported over the lifetime of a run are collected and
//! dumped as a single JSON object to stdout when the reporting guard is
//! dropped. Progress and timings go to stderr, stdout carries nothing but the
//! report, so runs can be piped straight into evaluation scripts.
//!
//! Reports from worker threads are silently dropped, report from the main
//! thread only.

use crate::built_info;
use serde_json::{Map, Value};
use std::cell::RefCell;

pub use serde_json::json;

thread_local! {
    static REPORTER: RefCell<Option<Map<String, Value>>> = RefCell::new(None);
}

/// Record a value under the given key and echo it to stderr when the
/// `report-to-stderr` feature is on. A no-op unless reporting was enabled.
pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    report_silent(key, val)
}

/// Record a value under the given key without ever echoing it.
pub fn report_silent(key: String, val: Value) {
    REPORTER.with(|reporter| {
        if let Some(map) = reporter.borrow_mut().as_mut() {
            map.insert(key, val);
        }
    });
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => { report($k.to_string(), json!($($json)+)) };
}

#[macro_export]
macro_rules! report_silent {
    ($k:expr, $($json:tt)+) => { report_silent($k.to_string(), json!($($json)+)) };
}

#[must_use]
pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| {
            if let Some(map) = reporter.borrow_mut().take() {
                println!("{}", Value::Object(map));
            }
        });
    }
}

/// Turn reporting on and record the run metadata. Keep the guard alive until
/// the end of main, dropping it prints the report.
pub fn enable_reporting(program: &str) -> ReportingGuard {
    REPORTER.with(|reporter| reporter.replace(Some(Map::new())));

    report!("git_revision", built_info::GIT_VERSION.unwrap_or(""));
    report!("build_target", built_info::TARGET);
    report!("build_profile", built_info::PROFILE);
    report!("build_time", built_info::BUILT_TIME_UTC);
    report!("build_with_rustc", built_info::RUSTC_VERSION);

    if let Ok(hostname) = std::process::Command::new("hostname").output() {
        report!("hostname", String::from_utf8(hostname.stdout).unwrap().trim());
    }

    report!("program", program);
    if let Ok(start_time) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        report!("start_time", start_time.as_secs());
    }
    report!("args", std::env::args().collect::<Vec<String>>());

    ReportingGuard(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // each test runs on its own thread, so the thread local reporter is isolated

    #[test]
    fn reporting_is_a_no_op_until_enabled() {
        report!("lost", 42);
        report_silent!("also_lost", 43);
        assert!(REPORTER.with(|reporter| reporter.borrow().is_none()));
    }

    #[test]
    fn enabled_reporter_collects_metadata_and_reported_values() {
        let guard = enable_reporting("report_test");
        report!("answer", 42);
        report_silent!("quiet_answer", 43);

        REPORTER.with(|reporter| {
            let reporter = reporter.borrow();
            let map = reporter.as_ref().unwrap();
            assert_eq!(map.get("program"), Some(&json!("report_test")));
            assert_eq!(map.get("answer"), Some(&json!(42)));
            assert_eq!(map.get("quiet_answer"), Some(&json!(43)));
            assert!(map.contains_key("start_time"));
            assert!(map.contains_key("args"));
        });

        drop(guard);
        assert!(REPORTER.with(|reporter| reporter.borrow().is_none()));
    }
}

pub mod benchmark;
pub use benchmark::*;
