// Statsd Reporter - A buffering Statsd client for Rust!
//
// Copyright 2015-2026 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::trace;

use crate::transport::Transport;
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Buffer that packs newline separated metric lines into datagrams no
/// larger than its capacity and hands each full datagram to a transport
/// in a single call.
///
/// The buffer is flushed *before* a line that wouldn't fit is appended, so
/// that line starts the next datagram instead of being truncated. Lines are
/// separated, not terminated, by `'\n'`.
#[derive(Debug)]
pub(crate) struct PacketWriter<T>
where
    T: Transport,
{
    buf: Vec<u8>,
    capacity: usize,
    inner: T,
}

impl<T> PacketWriter<T>
where
    T: Transport,
{
    pub(crate) fn new(inner: T, cap: usize) -> PacketWriter<T> {
        PacketWriter {
            buf: Vec::with_capacity(cap),
            capacity: cap,
            inner,
        }
    }

    /// Gets a reference to the underlying transport.
    pub(crate) fn get_ref(&self) -> &T {
        &self.inner
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a single metric line, flushing first if the line (plus its
    /// separator) would bring the buffer up to capacity.
    ///
    /// If that flush fails the line is not appended and the buffer is left
    /// as it was. A line longer than the capacity can never be sent without
    /// exceeding it and is rejected.
    pub(crate) fn write(&mut self, line: &str) -> MetricResult<()> {
        if line.len() > self.capacity {
            return Err(MetricError::from((
                ErrorKind::InvalidInput,
                "Metric line is larger than the packet size",
            )));
        }

        if self.buf.len() + line.len() + 1 >= self.capacity {
            self.flush()?;
        }

        if !self.buf.is_empty() {
            self.buf.push(b'\n');
        }

        self.buf.extend_from_slice(line.as_bytes());
        Ok(())
    }

    /// Send the whole buffer as one datagram and clear it. On failure the
    /// buffer is kept intact so a later flush can retry it. Flushing an
    /// empty buffer does nothing.
    pub(crate) fn flush(&mut self) -> MetricResult<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        let written = self.inner.send(&self.buf)?;
        trace!("Sent {} bytes to statsd", written);

        self.buf.clear();
        Ok(())
    }
}
