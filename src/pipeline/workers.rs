//! Hashing worker pool.

use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::engine::hashing::digest_file;
use crate::types::{FileResult, HashAlgorithm};

/// Single worker: hash each path from job_rx and send exactly one result per job.
/// Exits when the job queue is closed and drained, or when the collector has gone away.
fn hash_worker_loop(job_rx: Receiver<PathBuf>, result_tx: Sender<FileResult>, algorithm: HashAlgorithm) {
    while let Ok(path) = job_rx.recv() {
        let result = match digest_file(&path, algorithm) {
            Ok((digest, size)) => FileResult::hashed(path, digest, size),
            Err(err) => FileResult::failed(path, err),
        };
        if result_tx.send(result).is_err() {
            break;
        }
    }
}

/// Spawn `num_threads` hashing workers. Caller must drop its own `result_tx` after this so the
/// result queue closes once the last worker (and the walk) has exited.
pub fn spawn_hash_workers(
    job_rx: Receiver<PathBuf>,
    result_tx: &Sender<FileResult>,
    num_threads: usize,
    algorithm: HashAlgorithm,
) -> Vec<JoinHandle<()>> {
    (0..num_threads)
        .map(|_| {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            thread::spawn(move || hash_worker_loop(job_rx, result_tx, algorithm))
        })
        .collect()
}
