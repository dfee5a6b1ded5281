// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sampler::SampleRate;
use std::borrow::Cow;
use std::fmt::{self, Write};

/// Type of metric that knows how to display itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricType {
    Counter,
    Gauge,
    Timer,
    Set,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricType::Counter => "c".fmt(f),
            MetricType::Gauge => "g".fmt(f),
            MetricType::Timer => "ms".fmt(f),
            MetricType::Set => "s".fmt(f),
        }
    }
}

/// Floating point number that displays in its shortest round-trip form,
/// like `%g` without a fixed precision.
///
/// Plain decimal notation is used unless the decimal exponent is below -4
/// or at least 21, in which case the number is written as a mantissa and a
/// signed exponent of at least two digits (`1e+21`, `2.5e-07`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Shortest(pub(crate) f64);

impl fmt::Display for Shortest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" });
        }

        // LowerExp picks the same shortest digits as Display, so only the
        // placement of the decimal point is left to decide.
        let sci = format!("{:e}", v);
        let (mantissa, exp) = match sci.split_once('e') {
            Some((m, e)) => (m, e.parse::<i32>().map_err(|_| fmt::Error)?),
            None => return Err(fmt::Error),
        };

        if exp < -4 || exp >= 21 {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
        } else {
            fmt::Display::fmt(&v, f)
        }
    }
}

/// Holder for metric values that knows how to display itself
///
/// Numbers are written in their shortest round-trip form, so whole numbers
/// have no fractional part and other values keep full precision.
#[derive(Debug, Clone)]
pub(crate) enum MetricValue<'a> {
    Float(f64),
    Text(Cow<'a, str>),
}

impl<'a> fmt::Display for MetricValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Float(v) => Shortest(v).fmt(f),
            MetricValue::Text(ref v) => v.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    key: &'a str,
    val: MetricValue<'a>,
    type_: MetricType,
    sample_rate: SampleRate,
}

impl<'a> MetricFormatter<'a> {
    pub(crate) fn counter(prefix: &'a str, key: &'a str, val: f64, rate: SampleRate) -> Self {
        let mut fmt = Self::from_val(prefix, key, MetricValue::Float(val), MetricType::Counter);
        fmt.sample_rate = rate;
        fmt
    }

    pub(crate) fn gauge(prefix: &'a str, key: &'a str, val: f64) -> Self {
        Self::from_val(prefix, key, MetricValue::Float(val), MetricType::Gauge)
    }

    pub(crate) fn timer(prefix: &'a str, key: &'a str, millis: f64) -> Self {
        Self::from_val(prefix, key, MetricValue::Float(millis), MetricType::Timer)
    }

    pub(crate) fn set(prefix: &'a str, key: &'a str, val: &'a str) -> Self {
        Self::from_val(prefix, key, MetricValue::Text(sanitize_value(val)), MetricType::Set)
    }

    fn from_val(prefix: &'a str, key: &'a str, val: MetricValue<'a>, type_: MetricType) -> Self {
        MetricFormatter {
            prefix,
            key,
            val,
            type_,
            sample_rate: SampleRate::FULL,
        }
    }

    #[rustfmt::skip]
    fn size_hint(&self) -> usize {
        self.prefix.len() + self.key.len() + 1 /* : */ + 10 /* value */ + 1 /* | */ + 2 /* type */
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.size_hint());
        let _ = write!(out, "{}{}:{}|{}", self.prefix, self.key, self.val, self.type_);
        if !self.sample_rate.is_full() {
            let _ = write!(out, "|{}", self.sample_rate);
        }
        out
    }
}

/// Replace every run of characters that are not ASCII alphanumeric or `_`
/// with a single `_` so set values can't break the `:` and `|` delimiters
/// of the line protocol.
pub(crate) fn sanitize_value(value: &str) -> Cow<'_, str> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if value.chars().all(is_word) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.chars() {
        if is_word(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    Cow::Owned(out)
}
