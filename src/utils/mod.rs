pub mod config;
pub mod fd_limit;
pub mod logger;

pub use config::*;
pub use fd_limit::{
    cap_workers_by_fd_limit, max_open_fds, max_workers_by_fd_limit, workers_for_fd_limit,
};
pub use logger::setup_logging;
