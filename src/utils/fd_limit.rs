//! Cap the hashing pool by the process open-file limit.
//!
//! Every worker holds one open file while hashing and the walk holds one handle per directory
//! level, so a pool sized only by core count can hit EMFILE on hosts with a low `ulimit -n`.

use log::debug;

/// Open files attributed to each worker (the file being hashed plus slack for the walk).
pub const FDS_PER_WORKER: usize = 2;

/// Share of the soft limit the pool may use.
const FD_BUDGET_PERCENT: u64 = 80;

/// Soft RLIMIT_NOFILE, or `None` when unlimited or unavailable.
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } != 0 {
        return None;
    }
    match rlim.rlim_cur {
        libc::RLIM_INFINITY => None,
        cur => u64::try_from(cur).ok(),
    }
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Workers that fit in the FD budget for a soft limit of `limit` open files, at least one.
pub fn workers_for_fd_limit(limit: u64) -> usize {
    let budget = limit.saturating_mul(FD_BUDGET_PERCENT) / 100;
    let workers = usize::try_from(budget).unwrap_or(usize::MAX) / FDS_PER_WORKER;
    workers.max(1)
}

/// Workers that fit in the process FD budget. `None` if there is no limit to respect.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    max_open_fds().map(workers_for_fd_limit)
}

/// `wanted` workers, lowered to what the FD limit allows.
pub fn cap_workers_by_fd_limit(wanted: usize) -> usize {
    match max_workers_by_fd_limit() {
        Some(cap) if cap < wanted => {
            debug!("Capping workers {} -> {} (open-file limit)", wanted, cap);
            cap
        }
        _ => wanted,
    }
}
