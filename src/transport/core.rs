// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of I/O telemetry for a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SocketStats {
    bytes_sent: Arc<AtomicU64>,
    packets_sent: Arc<AtomicU64>,
    bytes_dropped: Arc<AtomicU64>,
    packets_dropped: Arc<AtomicU64>,
}

impl SocketStats {
    /// Count the outcome of one `send` of `len` bytes and pass it through.
    pub(crate) fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        let (bytes, packets, n) = match res {
            Ok(written) => (&self.bytes_sent, &self.packets_sent, written),
            Err(_) => (&self.bytes_dropped, &self.packets_dropped, len),
        };

        bytes.fetch_add(n as u64, Ordering::Relaxed);
        packets.fetch_add(1, Ordering::Relaxed);
        res
    }
}

impl From<&SocketStats> for TransportStats {
    fn from(stats: &SocketStats) -> Self {
        TransportStats {
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            packets_sent: stats.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: stats.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Trait for connectionless, best-effort byte sinks that carry buffered
/// metrics to a Statsd server.
///
/// Each call to `send` is one datagram: a batch of newline separated
/// metric lines, never split and never ending with a trailing newline.
///
/// ``` text
/// app.requests:1|c
/// app.latency:12.5|ms
/// app.users:bob|s
/// ```
///
/// Implementations give no delivery or ordering guarantee and must not
/// retry on failure.
pub trait Transport {
    /// Write a single datagram, returning the number of bytes written or
    /// an I/O error.
    fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Return I/O telemetry like bytes / packets sent or dropped.
    ///
    /// Note that not all transports implement this method and the default
    /// implementation returns zeros.
    fn stats(&self) -> TransportStats {
        TransportStats::default()
    }
}

impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).send(buf)
    }

    fn stats(&self) -> TransportStats {
        (**self).stats()
    }
}

/// Implementation of a `Transport` that discards all datagrams.
///
/// Useful for benchmarks or unit tests.
#[derive(Debug, Clone, Default)]
pub struct NopTransport;

impl Transport for NopTransport {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{NopTransport, SocketStats, Transport, TransportStats};
    use std::io;

    #[test]
    fn test_nop_transport() {
        let transport = NopTransport;
        assert_eq!(7, transport.send(b"baz:4|c").unwrap());
        assert_eq!(TransportStats::default(), transport.stats());
    }

    #[test]
    fn test_boxed_transport() {
        let transport: Box<dyn Transport + Send> = Box::new(NopTransport);
        assert_eq!(5, transport.send(b"a:1|g").unwrap());
    }

    #[test]
    fn test_socket_stats_update() {
        let stats = SocketStats::default();
        let _ = stats.update(Ok(10), 10);
        let _ = stats.update(Ok(4), 4);
        let _ = stats.update(Err(io::Error::new(io::ErrorKind::Other, "nope")), 6);

        let snapshot = TransportStats::from(&stats);
        assert_eq!(14, snapshot.bytes_sent);
        assert_eq!(2, snapshot.packets_sent);
        assert_eq!(6, snapshot.bytes_dropped);
        assert_eq!(1, snapshot.packets_dropped);
    }
}
