//! sumdir: concurrent directory hashing with duplicate and collision reporting.
//!
//! A walk thread feeds file paths through a rendezvous queue to a fixed pool of hashing workers;
//! their results are drained by a single collector, sorted by (digest, path) and classified.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod scan;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::ScanError;
pub use scan::scan_dir;
pub use types::*;

pub use engine::progress::ThroughputSample;

