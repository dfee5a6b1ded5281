// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transport::core::{SocketStats, Transport, TransportStats};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io;

/// `Transport` implementation that writes every datagram to the `Sender`
/// half of a channel while callers are given ownership of the `Receiver`
/// half.
///
/// This is not a general purpose transport, rather it's meant for verifying
/// the exact datagrams produced during the course of tests. By default, the
/// channel used is unbounded. The channel size can be limited using the
/// `with_capacity` method, in which case sending to a full channel fails
/// the same way a real transport would.
#[derive(Debug)]
pub struct SpyTransport {
    sender: Sender<Vec<u8>>,
    stats: SocketStats,
}

impl SpyTransport {
    pub fn new() -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<Vec<u8>>, Self) {
        let (tx, rx) = match queue {
            Some(sz) => bounded(sz),
            None => unbounded(),
        };

        let transport = SpyTransport {
            sender: tx,
            stats: SocketStats::default(),
        };
        (rx, transport)
    }
}

impl Transport for SpyTransport {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        let res = match self.sender.try_send(buf.to_vec()) {
            Err(TrySendError::Disconnected(_)) => Err(io::Error::new(io::ErrorKind::Other, "channel disconnected")),
            Err(TrySendError::Full(_)) => Err(io::Error::new(io::ErrorKind::Other, "channel full")),
            Ok(_) => Ok(buf.len()),
        };

        self.stats.update(res, buf.len())
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}
