// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of the library for easy glob imports
//!
//! # Example
//!
//! ```
//! use statsd_reporter::prelude::*;
//! use statsd_reporter::{BufferingClient, NopTransport};
//!
//! let client = BufferingClient::from_transport("some.prefix.", NopTransport);
//!
//! client.count("some.counter", 1.0, 1.0);
//! client.timing("some.timer", 23.0);
//! client.gauge("some.gauge", 45.0);
//! client.count_unique("some.set", "abc");
//! client.incr("some.other.counter");
//! client.flush().unwrap();
//! ```

pub use crate::client::{Reporter, ReporterExt};
