// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::client::Reporter;
use crate::types::MetricResult;

type LastValues = Mutex<HashMap<String, String>>;

fn set_last(values: &LastValues, bucket: &str, value: f64) {
    let mut map = values.lock().unwrap_or_else(PoisonError::into_inner);
    map.insert(bucket.to_string(), value.to_string());
}

fn get_last(values: &LastValues, bucket: &str) -> Option<String> {
    let map = values.lock().unwrap_or_else(PoisonError::into_inner);
    map.get(bucket).cloned()
}

fn snapshot(values: &LastValues) -> HashMap<String, String> {
    values.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// `Reporter` implementation that remembers the last value recorded for
/// each bucket instead of sending anything.
///
/// Counts, gauges, and timings are kept in separate maps keyed by the bucket
/// name as given (no prefix), with values formatted as plain decimals. No
/// sampling is applied and `count_unique` is ignored. Meant for asserting
/// on metrics emitted by code under test.
///
/// # Example
///
/// ```
/// use statsd_reporter::prelude::*;
/// use statsd_reporter::MockReporter;
///
/// let metrics = MockReporter::new();
/// metrics.count("jobs.done", 3.0, 0.1);
/// metrics.gauge("queue.depth", 12.5);
///
/// assert_eq!(Some("3".to_string()), metrics.count_value("jobs.done"));
/// assert_eq!(Some("12.5".to_string()), metrics.gauge_value("queue.depth"));
/// ```
#[derive(Debug, Default)]
pub struct MockReporter {
    counts: LastValues,
    gauges: LastValues,
    timings: LastValues,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_value(&self, bucket: &str) -> Option<String> {
        get_last(&self.counts, bucket)
    }

    pub fn gauge_value(&self, bucket: &str) -> Option<String> {
        get_last(&self.gauges, bucket)
    }

    pub fn timing_value(&self, bucket: &str) -> Option<String> {
        get_last(&self.timings, bucket)
    }

    /// Copy of the last value recorded for every counter bucket.
    pub fn counts(&self) -> HashMap<String, String> {
        snapshot(&self.counts)
    }

    /// Copy of the last value recorded for every gauge bucket.
    pub fn gauges(&self) -> HashMap<String, String> {
        snapshot(&self.gauges)
    }

    /// Copy of the last value recorded for every timing bucket.
    pub fn timings(&self) -> HashMap<String, String> {
        snapshot(&self.timings)
    }
}

impl Reporter for MockReporter {
    fn flush(&self) -> MetricResult<()> {
        Ok(())
    }

    fn count(&self, bucket: &str, value: f64, _sample_rate: f64) {
        set_last(&self.counts, bucket, value);
    }

    fn gauge(&self, bucket: &str, value: f64) {
        set_last(&self.gauges, bucket, value);
    }

    fn timing(&self, bucket: &str, millis: f64) {
        set_last(&self.timings, bucket, millis);
    }

    fn count_unique(&self, _bucket: &str, _value: &str) {}
}
