use log::debug;
use std::path::Path;
use std::thread::JoinHandle;

use crate::engine::tools::check_root_and_canonicalize;
use crate::error::ScanError;
use crate::pipeline;
use crate::types::ScanOpts;

/// Start the walk + hashing pipeline. Returns the result receiver and thread handles; caller drains
/// `result_rx` (see [`collect_results`](super::collect_results)) and then joins the threads.
pub fn run_pipeline(root: &Path, opts: &ScanOpts) -> Result<pipeline::PipelineHandles, ScanError> {
    let root = check_root_and_canonicalize(root)?;
    let tuning = pipeline::PipelineTuning::for_opts(opts);
    debug!(
        "pipeline: {} workers, {:?}, root {}",
        tuning.num_threads,
        opts.algorithm,
        root.display()
    );

    let channels = pipeline::create_pipeline_channels(&tuning);

    let walk_handle = pipeline::spawn_walk_thread(
        root.clone(),
        channels.job_tx,
        channels.result_tx.clone(),
    );

    let worker_handles = pipeline::spawn_hash_workers(
        channels.job_rx,
        &channels.result_tx,
        tuning.num_threads,
        opts.algorithm,
    );

    // Only the walk thread and the workers hold senders now; the queue closes when the last of them exits.
    drop(channels.result_tx);

    Ok(pipeline::PipelineHandles {
        root,
        result_rx: channels.result_rx,
        walk_handle,
        worker_handles,
    })
}

/// Join worker and walk threads (after the result stream is drained or dropped). Returns the walk's job count.
pub fn shutdown_pipeline_handles(
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<usize, ScanError> {
    let mut worker_panicked = false;
    for h in worker_handles {
        worker_panicked |= h.join().is_err();
    }
    let job_count = walk_handle
        .join()
        .map_err(|_| ScanError::ThreadPanicked("walk"))?;
    if worker_panicked {
        return Err(ScanError::ThreadPanicked("hash worker"));
    }
    Ok(job_count)
}
