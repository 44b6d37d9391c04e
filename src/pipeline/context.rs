//! Pipeline tuning, channels and handles shared between the walk thread, workers and collector.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::thread::JoinHandle;

use crate::types::{FileResult, ScanOpts};
use crate::utils::config::{ChannelCaps, WorkerThreadLimits};
use crate::utils::fd_limit::cap_workers_by_fd_limit;

/// Worker count and queue capacities for one scan.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    /// Job queue capacity (0 = rendezvous, the walk waits for a free worker).
    pub job_cap: usize,
    pub result_cap: usize,
}

impl PipelineTuning {
    /// Explicit `num_threads` wins; otherwise host parallelism capped by the FD limit. Never below 1.
    pub fn for_opts(opts: &ScanOpts) -> Self {
        let limits = WorkerThreadLimits::current();
        let num_threads = opts
            .num_threads
            .unwrap_or_else(|| cap_workers_by_fd_limit(limits.all_threads));
        Self {
            num_threads: num_threads.max(limits.floor),
            job_cap: ChannelCaps::JOBS,
            result_cap: ChannelCaps::RESULTS,
        }
    }
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): the collector drains `result_rx`,
/// then joins `walk_handle` and `worker_handles`.
pub struct PipelineHandles {
    pub root: PathBuf,
    pub result_rx: Receiver<FileResult>,
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
}

/// Job and result queues. Walk thread gets job_tx and a result_tx clone; workers get job_rx and result_tx.
pub struct PipelineChannels {
    pub job_tx: Sender<PathBuf>,
    pub job_rx: Receiver<PathBuf>,
    pub result_tx: Sender<FileResult>,
    pub result_rx: Receiver<FileResult>,
}

pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (job_tx, job_rx) = bounded::<PathBuf>(tuning.job_cap);
    let (result_tx, result_rx) = bounded::<FileResult>(tuning.result_cap);
    PipelineChannels {
        job_tx,
        job_rx,
        result_tx,
        result_rx,
    }
}
