// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A buffering Statsd client for Rust!
//!
//! Counters, gauges, timings, and sets are formatted into the Statsd line
//! protocol and packed into datagrams of a bounded size before being sent
//! to the server over UDP.
//!
//! ## Features
//!
//! * Counters (with sampling), gauges, timings, and sets.
//! * Multiple metrics per datagram, flushed before a datagram would exceed
//!   the configured packet size (512 bytes by default).
//! * Safe to share between threads.
//! * Never lets metrics break your program: recording methods don't return
//!   errors and a failed connection degrades to a no-op reporter.
//! * A `MockReporter` for asserting on metrics in tests.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Connect to a server and send a few metrics. If connecting fails, the
//! returned reporter silently discards everything and the error is handed
//! back separately.
//!
//! ```rust,no_run
//! use statsd_reporter::prelude::*;
//! use statsd_reporter::StatsReporter;
//!
//! let (metrics, err) = StatsReporter::new("metrics.example.com:8125", "my.app.");
//! if let Some(e) = err {
//!     eprintln!("Metrics disabled: {}", e);
//! }
//!
//! metrics.count("some.counter", 1.0, 1.0);
//! metrics.count("some.hot.path", 1.0, 0.1);
//! metrics.gauge("some.thing", 7.0);
//! metrics.timing("some.methodCall", 42.0);
//! metrics.count_unique("some.users", "user-1234");
//!
//! // Nothing is sent until the buffer fills up or it's flushed
//! metrics.flush().unwrap();
//! ```
//!
//! ### Flushing
//!
//! There is no background timer. Metrics sit in the buffer until adding
//! another one would overflow the packet size, `flush` is called, or the
//! client is dropped. Applications that emit metrics at a low rate should
//! call `flush` periodically.
//!
//! Errors from a flush that happens implicitly, while recording a metric,
//! can't be returned to the caller. They are passed to the client's error
//! handler, which logs them at `debug` level by default.
//!
//! ### Custom Settings
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use statsd_reporter::prelude::*;
//! use statsd_reporter::{BufferingClient, StatsReporter, UdpTransport};
//!
//! let (metrics, _err) = StatsReporter::from_result(
//!     UdpTransport::connect("metrics.example.com:8125", Duration::from_millis(500)).map(|t| {
//!         BufferingClient::builder("my.app.", t)
//!             .with_packet_size(1432)
//!             .with_error_handler(|e| eprintln!("metric error: {}", e))
//!             .build()
//!     }),
//! );
//!
//! metrics.incr("started");
//! ```
//!
//! ### Testing
//!
//! Code that depends on `&dyn Reporter` (or a generic `R: Reporter`) can
//! be given a `MockReporter` in tests, or a `BufferingClient` writing to a
//! `SpyTransport` to check the exact datagrams produced.
//!
//! ```rust
//! use statsd_reporter::prelude::*;
//! use statsd_reporter::{BufferingClient, SpyTransport};
//!
//! let (rx, transport) = SpyTransport::new();
//! let client = BufferingClient::from_transport("test.", transport);
//!
//! client.count("hits", 2.0, 1.0);
//! client.gauge("load", 0.75);
//! client.flush().unwrap();
//!
//! let datagram = rx.recv().unwrap();
//! assert_eq!(&b"test.hits:2|c\ntest.load:0.75|g"[..], datagram.as_slice());
//! ```

#![forbid(unsafe_code)]

use std::time::Duration;

/// Default port of a Statsd server.
pub const DEFAULT_PORT: u16 = 8125;

/// Default maximum size of a single datagram, small enough to avoid
/// fragmentation on typical networks.
pub const DEFAULT_PACKET_SIZE: usize = 512;

/// How long connecting to the server may take before giving up.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

pub use self::client::{BufferingClient, BufferingClientBuilder, NoOpClient, Reporter, ReporterExt, StatsReporter};

pub use self::mock::MockReporter;

pub use self::transport::{NopTransport, SpyTransport, Transport, TransportStats, UdpTransport};

pub use self::types::{ErrorKind, MetricError, MetricResult};

mod client;
mod format;
mod io;
mod mock;
pub mod prelude;
mod sampler;
mod transport;
mod types;
