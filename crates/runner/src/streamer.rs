// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batching of build output into log updates.

use nb_core::Clock;
use std::time::{Duration, Instant};

/// Buffers log lines and releases them at most once per `interval`.
///
/// [`LogStreamer::flush`] releases unconditionally; the runner calls it when
/// a build starts and when it completes. Between those, a batch is released
/// by the first [`LogStreamer::push`] that lands after the interval, or by
/// [`LogStreamer::due`] once the build has gone quiet.
pub struct LogStreamer<C: Clock> {
    clock: C,
    interval: Duration,
    pending: Vec<String>,
    last_flush: Option<Instant>,
}

impl<C: Clock> LogStreamer<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval, pending: Vec::new(), last_flush: None }
    }

    /// Buffer `line`; returns a batch when one is due.
    pub fn push(&mut self, line: impl Into<String>) -> Option<Vec<String>> {
        self.pending.push(line.into());
        self.due()
    }

    /// Release the buffered lines if the interval has passed since the last
    /// batch.
    pub fn due(&mut self) -> Option<Vec<String>> {
        if self.until_due()?.is_zero() {
            self.take()
        } else {
            None
        }
    }

    /// Time left before the buffered lines are due; `None` when nothing is
    /// buffered.
    pub fn until_due(&self) -> Option<Duration> {
        if self.pending.is_empty() {
            return None;
        }
        Some(match self.last_flush {
            Some(at) => self.interval.saturating_sub(self.clock.now().duration_since(at)),
            None => Duration::ZERO,
        })
    }

    /// Release everything buffered, regardless of the interval.
    pub fn flush(&mut self) -> Option<Vec<String>> {
        self.take()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn take(&mut self) -> Option<Vec<String>> {
        self.last_flush = Some(self.clock.now());
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
