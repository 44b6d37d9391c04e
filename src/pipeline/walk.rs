//! Tree walker: depth-first enumeration of regular files, feeding the job queue.

use crossbeam_channel::Sender;
use log::debug;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use walkdir::{DirEntry, WalkDir};

use crate::engine::tools::is_hidden_name;
use crate::error::ScanError;
use crate::types::FileResult;

/// One item from the directory walk: a regular file to hash, or the error that ends the walk.
pub enum WalkOutcome {
    File(PathBuf),
    Err(ScanError),
}

/// Hidden entries below the root are pruned together with their subtrees. The root itself is always walked.
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_hidden_name(entry.file_name())
}

/// Depth-first walk of `root` yielding regular files only. walkdir keeps its own stack of
/// open directories, so depth does not grow the call stack. Links are not followed.
pub fn walk_files(root: PathBuf) -> impl Iterator<Item = WalkOutcome> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_visible)
        .filter_map(|r| match r {
            Ok(entry) if entry.file_type().is_file() => Some(WalkOutcome::File(entry.into_path())),
            Ok(_) => None,
            Err(err) => Some(WalkOutcome::Err(ScanError::from_walk(err))),
        })
}

pub fn spawn_walk_thread(
    root: PathBuf,
    job_tx: Sender<PathBuf>,
    result_tx: Sender<FileResult>,
) -> JoinHandle<usize> {
    thread::spawn(move || run_walk_loop(job_tx, result_tx, walk_files(root)))
}

/// Send every file from `iter` to `job_tx` (blocking until a worker takes it). On the first error,
/// send it as a traversal failure on `result_tx` and stop. Drops `job_tx` on return so workers drain
/// and exit. Returns the number of jobs sent.
pub fn run_walk_loop<I>(job_tx: Sender<PathBuf>, result_tx: Sender<FileResult>, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => {
                if job_tx.send(path).is_err() {
                    debug!("walk: job queue disconnected after {} jobs", count);
                    break;
                }
                count += 1;
            }
            WalkOutcome::Err(err) => {
                debug!("walk: stopping on error: {}", err);
                let _ = result_tx.send(FileResult::traversal_failed(err));
                break;
            }
        }
    }
    drop(job_tx);
    debug!("walk: done, {} jobs queued", count);
    count
}
