//! Engine module: hashing, classification, progress and the CLI surface.

pub mod arg_parser;
pub mod classify;
pub mod cli;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use classify::{classify, sort_canonical, verify_duplicates};
pub use cli::{handle_run, write_groups, write_listing};
pub use hashing::{digest_file, digest_reader, files_identical};
pub use progress::{ThroughputMeter, ThroughputSample};
pub use tools::{
    canonical_order, check_root_and_canonicalize, cmp_path_bytes, is_hidden_name,
    path_relative_to, running_as_root,
};
