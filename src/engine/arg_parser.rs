use clap::Parser;
use std::path::PathBuf;

use crate::types::HashAlgorithm;
use crate::utils::config::THREADS_ENV;

/// Hash every regular file under a directory and report duplicates.
#[derive(Clone, Debug, Parser)]
#[command(name = "sumdir", version)]
#[command(about = "Hash every regular file under DIR in parallel and report duplicate files.")]
pub struct Cli {
    /// Directory to scan.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Number of hashing workers. Default: available parallelism.
    #[arg(long, short = 'j', env = THREADS_ENV, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Digest algorithm.
    #[arg(long, short = 'a', value_enum, default_value_t = HashAlgorithm::Sha1)]
    pub algorithm: HashAlgorithm,

    /// Skip files that cannot be read instead of aborting; list them on stderr.
    #[arg(long, short = 'k')]
    pub keep_going: bool,

    /// Byte-compare duplicate candidates; mismatches are counted as collisions.
    #[arg(long)]
    pub verify: bool,

    /// Print duplicate groups instead of one line per file.
    #[arg(long, short = 'g')]
    pub groups: bool,

    /// Do not print throughput samples.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Verbose (debug) logging.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
