// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::{debug, warn};
use rand::RngCore;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::format::MetricFormatter;
use crate::io::PacketWriter;
use crate::sampler::{SampleRate, Sampler};
use crate::transport::{Transport, TransportStats, UdpTransport};
use crate::types::{MetricError, MetricResult};
use crate::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PACKET_SIZE};

/// Capability shared by everything that records metrics.
///
/// Recording methods are fire-and-forget: they never return an error and
/// never panic. Problems writing to the network only become visible through
/// an explicit call to `flush`.
///
/// # Example
///
/// ```
/// use statsd_reporter::prelude::*;
/// use statsd_reporter::{BufferingClient, NopTransport};
///
/// fn handle_request(metrics: &dyn Reporter) {
///     metrics.count("requests", 1.0, 1.0);
///     metrics.timing("request.time", 12.5);
/// }
///
/// let client = BufferingClient::from_transport("app.", NopTransport);
/// handle_request(&client);
/// client.flush().unwrap();
/// ```
pub trait Reporter {
    /// Send any buffered metrics now, returning an error if they couldn't
    /// be written.
    fn flush(&self) -> MetricResult<()>;

    /// Increment (or decrement) a counter by `value`. Only a `sample_rate`
    /// fraction of calls are sent; the rate is included in the metric so the
    /// server can scale the value back up.
    fn count(&self, bucket: &str, value: f64, sample_rate: f64);

    /// Set a gauge to an arbitrary value. Only the value at flush time is
    /// stored by the server.
    fn gauge(&self, bucket: &str, value: f64);

    /// Record a time interval in milliseconds. Percentiles, mean, standard
    /// deviation, sum, and bounds are computed by the server.
    fn timing(&self, bucket: &str, millis: f64);

    /// Record a value in a set, letting the server count unique values seen
    /// between its flushes.
    fn count_unique(&self, bucket: &str, value: &str);
}

/// Convenience methods for recording common metrics, available on every
/// `Reporter`.
pub trait ReporterExt: Reporter {
    /// Increment a counter by one.
    fn incr(&self, bucket: &str) {
        self.count(bucket, 1.0, 1.0);
    }

    /// Decrement a counter by one.
    fn decr(&self, bucket: &str) {
        self.count(bucket, -1.0, 1.0);
    }

    /// Record a `Duration` as a timing in (fractional) milliseconds.
    fn timing_duration(&self, bucket: &str, duration: Duration) {
        self.timing(bucket, duration.as_nanos() as f64 / 1_000_000.0);
    }
}

impl<T> ReporterExt for T where T: Reporter + ?Sized {}

fn log_error_handler(err: MetricError) {
    debug!("Discarded metric error: {}", err);
}

/// Builder for creating and customizing `BufferingClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `BufferingClient` struct.
///
/// # Example
///
/// ```
/// use statsd_reporter::prelude::*;
/// use statsd_reporter::{BufferingClient, MetricError, NopTransport};
///
/// fn my_error_handler(err: MetricError) {
///     eprintln!("Metric error! {}", err);
/// }
///
/// let client = BufferingClient::builder("prefix.", NopTransport)
///     .with_packet_size(1432)
///     .with_error_handler(my_error_handler)
///     .build();
///
/// client.count("something", 123.0, 1.0);
/// ```
pub struct BufferingClientBuilder {
    prefix: String,
    packet_size: usize,
    transport: Box<dyn Transport + Send>,
    sampler: Option<Sampler>,
    errors: Box<dyn Fn(MetricError) + Sync + Send>,
}

impl BufferingClientBuilder {
    // Set the required fields and defaults for optional fields
    fn new<T>(prefix: &str, transport: T) -> Self
    where
        T: Transport + Send + 'static,
    {
        BufferingClientBuilder {
            // required
            prefix: prefix.to_string(),
            transport: Box::new(transport),

            // optional with defaults
            packet_size: DEFAULT_PACKET_SIZE,
            sampler: None,
            errors: Box::new(log_error_handler),
        }
    }

    /// Set the maximum size in bytes of a single datagram.
    ///
    /// The default of 512 bytes stays under the MTU of most networks so
    /// buffered sends aren't fragmented. Networks with a known larger MTU
    /// (e.g. 1500 byte Ethernet) can use a bigger value.
    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = packet_size;
        self
    }

    /// Set the random source used to decide which sampled counters are sent.
    ///
    /// Defaults to a `StdRng` seeded from system entropy. Tests can supply
    /// a seeded generator to make sampling deterministic.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.sampler = Some(Sampler::with_rng(rng));
        self
    }

    /// Set an error handler for errors that recording methods can't return.
    ///
    /// The handler is invoked when a flush triggered by a full buffer fails
    /// or a metric is too large to ever be sent. It should consume the error
    /// without panicking. By default these errors are logged at `debug` level
    /// and otherwise discarded.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) + Sync + Send + 'static,
    {
        self.errors = Box::new(errors);
        self
    }

    /// Construct a new `BufferingClient` instance based on current settings.
    pub fn build(self) -> BufferingClient {
        BufferingClient {
            prefix: self.prefix,
            writer: Mutex::new(PacketWriter::new(self.transport, self.packet_size)),
            sampler: self.sampler.unwrap_or_else(Sampler::from_entropy),
            errors: self.errors,
        }
    }
}

/// Client that formats metrics and packs them into datagrams before
/// writing them to a `Transport`.
///
/// Metric lines are appended to a buffer. When appending a line would bring
/// the buffer up to the packet size, the buffer is sent as a single datagram
/// first and the line starts the next one. Nothing is sent on a timer: low
/// volume applications should call `flush` periodically so metrics don't
/// linger in the buffer. Whatever is still buffered is flushed when the
/// client is dropped.
///
/// # Threading
///
/// The client is `Send` and `Sync` and is meant to be shared, usually via
/// an `Arc`. A single lock covers the whole check, flush, and append
/// sequence so datagrams never exceed the packet size and lines from
/// different threads are never interleaved.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
/// use statsd_reporter::prelude::*;
/// use statsd_reporter::{BufferingClient, UdpTransport};
///
/// let transport = UdpTransport::connect("localhost:8125", Duration::from_secs(1)).unwrap();
/// let client = Arc::new(BufferingClient::from_transport("some.prefix.", transport));
///
/// let local = Arc::clone(&client);
/// thread::spawn(move || {
///     local.incr("worker.started");
/// });
/// ```
pub struct BufferingClient {
    prefix: String,
    writer: Mutex<PacketWriter<Box<dyn Transport + Send>>>,
    sampler: Sampler,
    errors: Box<dyn Fn(MetricError) + Sync + Send>,
}

impl BufferingClient {
    /// Create a new client that uses the given prefix for all metrics
    /// written to the given `Transport`, with default settings.
    ///
    /// The prefix is prepended verbatim, so it should include any trailing
    /// separator: a prefix of `"foo.bar."` and a bucket of `"baz"` give
    /// `"foo.bar.baz"`. The prefix may be empty.
    pub fn from_transport<T>(prefix: &str, transport: T) -> Self
    where
        T: Transport + Send + 'static,
    {
        Self::builder(prefix, transport).build()
    }

    /// Create a new builder with the provided prefix and transport.
    pub fn builder<T>(prefix: &str, transport: T) -> BufferingClientBuilder
    where
        T: Transport + Send + 'static,
    {
        BufferingClientBuilder::new(prefix, transport)
    }

    /// Return the prefix prepended to every bucket.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the maximum size in bytes of a single datagram.
    pub fn packet_size(&self) -> usize {
        self.lock_writer().capacity()
    }

    /// Return I/O telemetry of the underlying transport.
    pub fn stats(&self) -> TransportStats {
        self.lock_writer().get_ref().stats()
    }

    // A panic while holding the lock can't leave the buffer in a state
    // worse than a dropped datagram, so keep using it.
    fn lock_writer(&self) -> MutexGuard<'_, PacketWriter<Box<dyn Transport + Send>>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, fmt: MetricFormatter<'_>) {
        if let Err(e) = self.send(&fmt.format()) {
            (self.errors)(e);
        }
    }

    fn send(&self, line: &str) -> MetricResult<()> {
        self.lock_writer().write(line)
    }
}

impl Reporter for BufferingClient {
    fn flush(&self) -> MetricResult<()> {
        self.lock_writer().flush()
    }

    fn count(&self, bucket: &str, value: f64, sample_rate: f64) {
        let rate = SampleRate::new(sample_rate);
        if self.sampler.sample(rate) {
            self.record(MetricFormatter::counter(&self.prefix, bucket, value, rate));
        }
    }

    fn gauge(&self, bucket: &str, value: f64) {
        self.record(MetricFormatter::gauge(&self.prefix, bucket, value));
    }

    fn timing(&self, bucket: &str, millis: f64) {
        self.record(MetricFormatter::timer(&self.prefix, bucket, millis));
    }

    fn count_unique(&self, bucket: &str, value: &str) {
        self.record(MetricFormatter::set(&self.prefix, bucket, value));
    }
}

impl Drop for BufferingClient {
    fn drop(&mut self) {
        if let Err(e) = self.lock_writer().flush() {
            debug!("Failed to flush buffered metrics on drop: {}", e);
        }
    }
}

impl fmt::Debug for BufferingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BufferingClient {{ prefix: {:?}, writer: ..., sampler: {:?}, errors: ... }}",
            self.prefix, self.sampler,
        )
    }
}

/// Reporter that does nothing. Every method returns immediately and
/// `flush` always succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpClient;

impl Reporter for NoOpClient {
    fn flush(&self) -> MetricResult<()> {
        Ok(())
    }

    fn count(&self, _bucket: &str, _value: f64, _sample_rate: f64) {}

    fn gauge(&self, _bucket: &str, _value: f64) {}

    fn timing(&self, _bucket: &str, _millis: f64) {}

    fn count_unique(&self, _bucket: &str, _value: &str) {}
}

/// Reporter returned by the connecting constructors: either a live
/// `BufferingClient` or, when the connection couldn't be set up, a
/// `NoOpClient`.
///
/// Code that records metrics never needs to care which one it has; the
/// connection error is returned separately so it can be logged or ignored.
///
/// # Example
///
/// ```
/// use statsd_reporter::prelude::*;
/// use statsd_reporter::StatsReporter;
///
/// let (metrics, err) = StatsReporter::new("127.0.0.1:8125", "my.app.");
/// if let Some(e) = err {
///     eprintln!("metrics disabled: {}", e);
/// }
///
/// metrics.incr("started");
/// metrics.gauge("workers", 8.0);
/// ```
#[derive(Debug)]
pub enum StatsReporter {
    Buffering(BufferingClient),
    NoOp(NoOpClient),
}

impl StatsReporter {
    /// Connect to the statsd server at `host` (`"name:port"`), using a 512
    /// byte packet size.
    pub fn new(host: &str, prefix: &str) -> (StatsReporter, Option<MetricError>) {
        Self::with_packet_size(host, prefix, DEFAULT_PACKET_SIZE)
    }

    /// Connect to the statsd server at `host` (`"name:port"`) and use
    /// `prefix` for all bucket names.
    ///
    /// Connecting is attempted once with a one second timeout. If it fails
    /// the error is returned together with a no-op reporter, so code that
    /// records metrics keeps running without them.
    pub fn with_packet_size(host: &str, prefix: &str, packet_size: usize) -> (StatsReporter, Option<MetricError>) {
        Self::from_result(
            UdpTransport::connect(host, DEFAULT_CONNECT_TIMEOUT)
                .map(|t| BufferingClient::builder(prefix, t).with_packet_size(packet_size).build()),
        )
    }

    /// Turn the result of building a client into a reporter that is always
    /// usable, falling back to a no-op reporter on error.
    ///
    /// This is the same degrade policy as `new`, for clients built with
    /// custom settings.
    ///
    /// ```
    /// use std::time::Duration;
    /// use statsd_reporter::{BufferingClient, StatsReporter, UdpTransport};
    ///
    /// let (metrics, _err) = StatsReporter::from_result(
    ///     UdpTransport::connect("127.0.0.1:8125", Duration::from_millis(250))
    ///         .map(|t| BufferingClient::builder("my.app.", t).with_packet_size(1432).build()),
    /// );
    /// ```
    pub fn from_result(res: MetricResult<BufferingClient>) -> (StatsReporter, Option<MetricError>) {
        match res {
            Ok(client) => (StatsReporter::Buffering(client), None),
            Err(e) => {
                warn!("Unable to set up statsd client, metrics are disabled: {}", e);
                (StatsReporter::NoOp(NoOpClient), Some(e))
            }
        }
    }

    /// True if this reporter discards everything.
    pub fn is_noop(&self) -> bool {
        matches!(self, StatsReporter::NoOp(_))
    }
}

impl From<BufferingClient> for StatsReporter {
    fn from(client: BufferingClient) -> Self {
        StatsReporter::Buffering(client)
    }
}

impl From<NoOpClient> for StatsReporter {
    fn from(client: NoOpClient) -> Self {
        StatsReporter::NoOp(client)
    }
}

impl Reporter for StatsReporter {
    fn flush(&self) -> MetricResult<()> {
        match self {
            StatsReporter::Buffering(c) => c.flush(),
            StatsReporter::NoOp(c) => c.flush(),
        }
    }

    fn count(&self, bucket: &str, value: f64, sample_rate: f64) {
        match self {
            StatsReporter::Buffering(c) => c.count(bucket, value, sample_rate),
            StatsReporter::NoOp(c) => c.count(bucket, value, sample_rate),
        }
    }

    fn gauge(&self, bucket: &str, value: f64) {
        match self {
            StatsReporter::Buffering(c) => c.gauge(bucket, value),
            StatsReporter::NoOp(c) => c.gauge(bucket, value),
        }
    }

    fn timing(&self, bucket: &str, millis: f64) {
        match self {
            StatsReporter::Buffering(c) => c.timing(bucket, millis),
            StatsReporter::NoOp(c) => c.timing(bucket, millis),
        }
    }

    fn count_unique(&self, bucket: &str, value: &str) {
        match self {
            StatsReporter::Buffering(c) => c.count_unique(bucket, value),
            StatsReporter::NoOp(c) => c.count_unique(bucket, value),
        }
    }
}
