// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crossbeam_channel::{bounded, RecvTimeoutError};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread;
use std::time::Duration;

use crate::transport::core::{SocketStats, Transport, TransportStats};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Resolve `host` to its first socket address, giving up after `timeout`.
///
/// Name resolution through the system resolver can't be interrupted, so it
/// runs on a detached helper thread and the caller waits on a channel. If
/// the deadline passes the thread is left to finish on its own.
fn resolve_addr(host: &str, timeout: Duration) -> MetricResult<SocketAddr> {
    let (tx, rx) = bounded(1);
    let owned = host.to_string();

    thread::Builder::new()
        .name("statsd-resolve".to_string())
        .spawn(move || {
            let res = owned.to_socket_addrs().map(|mut addrs| addrs.next());
            let _ = tx.send(res);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(Some(addr))) => Ok(addr),
        Ok(Ok(None)) => Err(MetricError::from((
            ErrorKind::InvalidInput,
            "No socket addresses yielded",
        ))),
        Ok(Err(e)) => Err(MetricError::from(e)),
        Err(RecvTimeoutError::Timeout) => Err(MetricError::from(io::Error::new(
            io::ErrorKind::TimedOut,
            "Timed out resolving statsd host",
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(MetricError::from((
            ErrorKind::InvalidInput,
            "Statsd host resolution did not complete",
        ))),
    }
}

fn unspecified_for(addr: &SocketAddr) -> &'static str {
    match addr {
        SocketAddr::V4(_) => "0.0.0.0:0",
        SocketAddr::V6(_) => "[::]:0",
    }
}

/// Implementation of a `Transport` that writes datagrams to a connected
/// UDP socket.
///
/// The socket is connected once, when the transport is created, and stays
/// connected for the life of the transport. Since UDP is connectionless,
/// a successful connect only means the address resolved and a local socket
/// could be bound; it says nothing about whether a server is listening.
#[derive(Debug)]
pub struct UdpTransport {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpTransport {
    /// Resolve `host` (of the form `"name:port"`) and connect a new UDP
    /// socket to it.
    ///
    /// Both resolving the host and the socket's write timeout are bounded by
    /// `timeout`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use statsd_reporter::UdpTransport;
    ///
    /// let transport = UdpTransport::connect("metrics.example.com:8125", Duration::from_secs(1));
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server in time.
    /// * The host address is otherwise unable to be parsed.
    /// * A local socket can't be bound or connected.
    pub fn connect(host: &str, timeout: Duration) -> MetricResult<UdpTransport> {
        let addr = resolve_addr(host, timeout)?;
        let socket = UdpSocket::bind(unspecified_for(&addr))?;
        if !timeout.is_zero() {
            socket.set_write_timeout(Some(timeout))?;
        }
        socket.connect(addr)?;

        Ok(UdpTransport {
            addr,
            socket,
            stats: SocketStats::default(),
        })
    }

    /// Construct a new `UdpTransport` from an already bound socket,
    /// connecting it to `addr`.
    ///
    /// The socket should already have any desired configuration applied
    /// (blocking vs non-blocking, timeouts, etc.).
    pub fn from_socket(addr: SocketAddr, socket: UdpSocket) -> MetricResult<UdpTransport> {
        socket.connect(addr)?;
        Ok(UdpTransport {
            addr,
            socket,
            stats: SocketStats::default(),
        })
    }

    /// Address of the statsd server this transport writes to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.stats.update(self.socket.send(buf), buf.len())
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}
