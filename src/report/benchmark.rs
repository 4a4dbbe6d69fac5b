//! Helpers to measure and report how long the table loops take.

use super::*;
use std::time::{Duration, Instant};

/// Measure how long executing the lambda takes, print the time to stderr,
/// report it as `running_time_ms` and return the result of the lambda.
pub fn report_time<Out, F: FnOnce() -> Out>(name: &str, f: F) -> Out {
    report_time_with_key(name, "running_time_ms", f)
}

/// Like `report_time` but reporting under a custom key.
pub fn report_time_with_key<Out, F: FnOnce() -> Out>(name: &str, key: &'static str, f: F) -> Out {
    eprintln!("starting {}", name);
    let (res, duration) = measure(f);
    let t_passed = duration.as_secs_f64() * 1000.0;
    eprintln!("{} done - took: {}ms", name, t_passed);
    report!(key, t_passed);
    res
}

/// Execute the lambda and return its result together with the elapsed time.
pub fn measure<Out, F: FnOnce() -> Out>(f: F) -> (Out, Duration) {
    let start = Instant::now();
    let res = f();
    (res, start.elapsed())
}
