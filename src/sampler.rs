// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::format::Shortest;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Represents the sample rate of a metric. This is used to determine how often
/// a metric should be sent to the statsd server.
///
/// Rates above `1.0` are clamped to `1.0` (always sent, no suffix). Rates of
/// zero, below zero, or NaN never pass sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SampleRate(f64);

impl SampleRate {
    pub(crate) const FULL: SampleRate = SampleRate(1.0);

    pub(crate) fn new(rate: f64) -> Self {
        if rate > 1.0 {
            Self::FULL
        } else {
            SampleRate(rate)
        }
    }

    /// True when every event is sent and the `|@rate` suffix is omitted.
    pub(crate) fn is_full(&self) -> bool {
        self.0 == 1.0
    }

    pub(crate) fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", Shortest(self.0))
    }
}

/// Decides which sampled events are kept, using a random source owned by
/// the client instead of a process-wide generator.
pub(crate) struct Sampler {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Sampler {
    pub(crate) fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub(crate) fn with_rng<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Sampler {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Return `true` if an event recorded at this rate should be sent.
    pub(crate) fn sample(&self, rate: SampleRate) -> bool {
        if rate.is_full() {
            return true;
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let draw: f64 = rng.gen();
        draw < rate.value()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sampler { rng: ... }")
    }
}
