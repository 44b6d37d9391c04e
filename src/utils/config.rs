//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::time::Duration;

// ---- Environment ----

/// Environment variable overriding the worker thread count (read by the CLI).
pub const THREADS_ENV: &str = "SUMDIR_THREADS";

// ---- Worker threads ----

/// Thread limits for the hashing pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Never run fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

// ---- Channels ----

/// Capacities of the two pipeline queues.
pub struct ChannelCaps;

impl ChannelCaps {
    /// Job queue is a rendezvous channel: the walk blocks until a worker is ready.
    pub const JOBS: usize = 0;
    /// Result queue: small buffer so workers rarely wait on the collector.
    pub const RESULTS: usize = 256;
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming a file through the hasher (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
    /// Buffer size per file when byte-comparing duplicate candidates. 256 KB.
    pub const VERIFY_CHUNK_SIZE: usize = 256 * 1024;
}

// ---- Progress ----

/// Throughput sampling.
pub struct ProgressConsts;

impl ProgressConsts {
    /// A sample is emitted once more than this much time has passed since the previous one.
    pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
    /// Bytes per reported megabyte (MiB).
    pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
}
