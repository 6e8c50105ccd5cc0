// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throttled rendering of a streamed reply.
//!
//! Fragments accumulate in a buffer; the whole buffer is handed to the
//! [`DisplaySink`] once enough characters are pending or enough time has
//! passed since the previous flush.

use std::time::{Duration, Instant};

use rolecall_config::model::DisplayConfig;

/// Where an in-progress reply is shown.
pub trait DisplaySink: Send {
    /// Replaces the in-progress reply with `text` (the full text so far).
    fn render(&mut self, text: &str);

    /// The reply is final; the next `render` starts a new one.
    fn complete(&mut self);

    /// Discards the in-progress reply after a failed attempt.
    fn abandon(&mut self);
}

/// A sink that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn render(&mut self, _text: &str) {}
    fn complete(&mut self) {}
    fn abandon(&mut self) {}
}

/// Flush thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_chars: usize,
    pub min_interval: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_chars: 160,
            min_interval: Duration::from_millis(40),
        }
    }
}

impl From<&DisplayConfig> for BatchPolicy {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            batch_chars: config.batch_chars,
            min_interval: Duration::from_millis(config.min_interval_ms),
        }
    }
}

pub struct DisplayBatcher<'a> {
    sink: &'a mut dyn DisplaySink,
    policy: BatchPolicy,
    buffer: String,
    pending_chars: usize,
    last_flush: Instant,
    flushes: usize,
}

impl<'a> DisplayBatcher<'a> {
    pub fn new(sink: &'a mut dyn DisplaySink, policy: BatchPolicy) -> Self {
        Self::starting_at(sink, policy, Instant::now())
    }

    /// Like [`DisplayBatcher::new`] with an explicit start time.
    pub fn starting_at(sink: &'a mut dyn DisplaySink, policy: BatchPolicy, start: Instant) -> Self {
        Self {
            sink,
            policy,
            buffer: String::new(),
            pending_chars: 0,
            last_flush: start,
            flushes: 0,
        }
    }

    pub fn push(&mut self, fragment: &str) {
        self.push_at(fragment, Instant::now());
    }

    /// Appends `fragment` as if it arrived at `now`. Empty fragments are ignored.
    pub fn push_at(&mut self, fragment: &str, now: Instant) {
        if fragment.is_empty() {
            return;
        }
        self.buffer.push_str(fragment);
        self.pending_chars += fragment.chars().count();

        if self.pending_chars >= self.policy.batch_chars
            || now.saturating_duration_since(self.last_flush) >= self.policy.min_interval
        {
            self.sink.render(&self.buffer);
            self.pending_chars = 0;
            self.last_flush = now;
            self.flushes += 1;
        }
    }

    /// Number of intermediate flushes so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Renders and returns the trimmed final text. Nothing is rendered when
    /// it is empty.
    pub fn finish(self) -> String {
        let text = self.buffer.trim().to_string();
        if !text.is_empty() {
            self.sink.render(&text);
        }
        text
    }

    /// Drops the buffer and tells the sink to discard what it showed.
    pub fn abandon(self) {
        self.sink.abandon();
    }
}
