//! Whole-scan driver: Walking+Hashing → Draining → Sorting → Reporting.

use log::debug;
use std::path::Path;

use crate::engine::classify::{classify, verify_duplicates};
use crate::engine::progress::ThroughputSample;
use crate::error::ScanError;
use crate::pipeline::{PipelineHandles, collect_results, run_pipeline, shutdown_pipeline_handles};
use crate::types::{Report, ScanOpts};

/// Hash every regular file under `root` and classify the results.
///
/// Fails on the first traversal error, and on the first unreadable file unless `opts.policy` is
/// [`KeepGoing`](crate::FailurePolicy::KeepGoing). On failure no partial report is returned.
/// `on_sample` receives throughput samples while results are drained.
pub fn scan_dir<F>(root: &Path, opts: &ScanOpts, on_sample: F) -> Result<Report, ScanError>
where
    F: FnMut(&ThroughputSample),
{
    let PipelineHandles {
        root,
        result_rx,
        walk_handle,
        worker_handles,
    } = run_pipeline(root, opts)?;

    // result_rx is consumed here; on early return it is dropped before the joins below.
    let collected = collect_results(result_rx, opts.policy, on_sample);
    let job_count = shutdown_pipeline_handles(walk_handle, worker_handles);
    let collected = collected?;
    let job_count = job_count?;
    debug!(
        "scan: {} jobs, {} hashed, {} skipped",
        job_count,
        collected.results.len(),
        collected.skipped.len()
    );
    debug_assert_eq!(job_count, collected.results.len() + collected.skipped.len());

    let mut report = classify(collected.results, &root, collected.skipped);
    if opts.verify {
        let reclassified = verify_duplicates(&mut report)?;
        debug!("verify: {} digest matches reclassified as collisions", reclassified);
    }
    Ok(report)
}
