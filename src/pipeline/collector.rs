//! Result collector: drains the result queue into a buffered result set.

use crossbeam_channel::Receiver;
use log::{debug, warn};
use std::time::Instant;

use crate::engine::progress::{ThroughputMeter, ThroughputSample};
use crate::error::ScanError;
use crate::types::{FailurePolicy, FileResult, SkippedFile};

/// Everything the collector accumulated: hashed results in arrival order plus skipped files.
#[derive(Debug, Default)]
pub struct Collected {
    pub results: Vec<FileResult>,
    pub skipped: Vec<SkippedFile>,
}

/// Receive until every sender (walk thread and all workers) has been dropped.
///
/// Under [`FailurePolicy::FailFast`] the first error ends collection: `result_rx` is dropped on
/// return, so workers fail their next send and exit, which in turn unblocks the walk. Results
/// received so far are discarded. Under [`FailurePolicy::KeepGoing`] per-file errors are recorded as
/// skipped and a traversal failure still aborts.
///
/// `on_sample` is called with each throughput sample (about once a second).
pub fn collect_results<F>(
    result_rx: Receiver<FileResult>,
    policy: FailurePolicy,
    mut on_sample: F,
) -> Result<Collected, ScanError>
where
    F: FnMut(&ThroughputSample),
{
    let mut collected = Collected::default();
    let mut meter = ThroughputMeter::new(Instant::now());

    while let Ok(mut result) = result_rx.recv() {
        if let Some(sample) = meter.record(result.size, Instant::now()) {
            on_sample(&sample);
        }
        let traversal = result.is_traversal_failure();
        let Some(err) = result.error.take() else {
            collected.results.push(result);
            continue;
        };
        if policy == FailurePolicy::KeepGoing && !traversal {
            warn!("skipping {}: {}", result.path.display(), err);
            collected.skipped.push(SkippedFile {
                path: result.path,
                reason: err.to_string(),
            });
            continue;
        }
        debug!(
            "collector: aborting after {} results: {}",
            collected.results.len(),
            err
        );
        return Err(err);
    }

    debug!(
        "collector: channel closed, {} results, {} skipped",
        collected.results.len(),
        collected.skipped.len()
    );
    Ok(collected)
}
