//! Throughput sampling for the result collector.

use std::fmt;
use std::time::{Duration, Instant};

use crate::utils::config::ProgressConsts;

/// One throughput reading, emitted roughly once per [`ProgressConsts::SAMPLE_INTERVAL`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThroughputSample {
    /// MB/s over the window since the previous sample.
    pub mb_per_sec: f64,
    /// Results received in that window.
    pub files: usize,
    /// Mean of all window rates so far.
    pub mb_per_sec_total: f64,
}

impl fmt::Display for ThroughputSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MB/s: {:.2}  files: {}  MB/s (total): {:.2}",
            self.mb_per_sec, self.files, self.mb_per_sec_total
        )
    }
}

/// Window accumulator. Owned and updated by the collector only, so no locking.
#[derive(Debug)]
pub struct ThroughputMeter {
    interval: Duration,
    window_start: Instant,
    bytes: u64,
    files: usize,
    samples: u32,
    mb_per_sec_total: f64,
}

impl ThroughputMeter {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, ProgressConsts::SAMPLE_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            window_start: now,
            bytes: 0,
            files: 0,
            samples: 0,
            mb_per_sec_total: 0.0,
        }
    }

    /// Account one result of `size` bytes received at `now`. Returns a sample when the
    /// window has run longer than the interval, then starts a new window.
    pub fn record(&mut self, size: u64, now: Instant) -> Option<ThroughputSample> {
        self.bytes += size;
        self.files += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed <= self.interval {
            return None;
        }
        self.samples += 1;
        let mb_per_sec = self.bytes as f64 / elapsed.as_secs_f64() / ProgressConsts::BYTES_PER_MB;
        self.mb_per_sec_total += (mb_per_sec - self.mb_per_sec_total) / f64::from(self.samples);
        let sample = ThroughputSample {
            mb_per_sec,
            files: self.files,
            mb_per_sec_total: self.mb_per_sec_total,
        };
        self.window_start = now;
        self.bytes = 0;
        self.files = 0;
        Some(sample)
    }

    /// Mean rate over all samples emitted so far (0 before the first).
    pub fn mb_per_sec_total(&self) -> f64 {
        self.mb_per_sec_total
    }
}
