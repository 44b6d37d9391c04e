//! Public and internal types for the sumdir API and pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::error::ScanError;
use crate::utils::config::ProgressConsts;

/// Fixed-length content digest. Ordered bytewise; displayed as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(Box<[u8]>);

impl Digest {
    pub fn new(bytes: &[u8]) -> Self {
        Digest(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Digest algorithm used by the hashing workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HashAlgorithm {
    /// SHA-1, 20-byte digests.
    #[default]
    Sha1,
    /// BLAKE3, 32-byte digests.
    Blake3,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Blake3 => 32,
        }
    }
}

/// What the collector does with a file that could not be hashed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole scan on the first error (traversal or hashing).
    #[default]
    FailFast,
    /// Skip unreadable files and list them in [`Report::skipped`]. Traversal errors still abort.
    KeepGoing,
}

/// Outcome of hashing one job. Exactly one per job, plus at most one traversal failure
/// (empty `path`, no digest) sent by the walker.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub digest: Option<Digest>,
    pub size: u64,
    pub error: Option<ScanError>,
}

impl FileResult {
    pub fn hashed(path: PathBuf, digest: Digest, size: u64) -> Self {
        FileResult {
            path,
            digest: Some(digest),
            size,
            error: None,
        }
    }

    pub fn failed(path: PathBuf, error: ScanError) -> Self {
        FileResult {
            path,
            digest: None,
            size: 0,
            error: Some(error),
        }
    }

    /// Synthetic result carrying the error that stopped the walk.
    pub fn traversal_failed(error: ScanError) -> Self {
        Self::failed(PathBuf::new(), error)
    }

    pub fn is_traversal_failure(&self) -> bool {
        self.error.is_some() && self.path.as_os_str().is_empty()
    }
}

/// A file left out of the report under [`FailurePolicy::KeepGoing`].
#[derive(Clone, Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// How a report entry relates to the first entry of its digest run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// First entry of its digest run.
    Original,
    /// Same digest and size as the run's first entry.
    Duplicate,
    /// Same digest as the run's first entry but a different size (or different bytes after verify).
    Collision,
}

/// One line of the report, in canonical order.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    pub digest: Digest,
    /// Absolute path as produced by the walker.
    pub path: PathBuf,
    /// Path relative to the scanned root.
    pub rel_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
}

/// Totals over a classified result set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub total_bytes: u64,
    pub duplicates: usize,
    pub duplicate_bytes: u64,
    pub collisions: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn duplicate_mb(&self) -> f64 {
        self.duplicate_bytes as f64 / ProgressConsts::BYTES_PER_MB
    }

    pub fn total_mb(&self) -> f64 {
        self.total_bytes as f64 / ProgressConsts::BYTES_PER_MB
    }
}

/// Files sharing one digest and size: the run's first entry plus its duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub digest: Digest,
    pub size: u64,
    /// Relative paths in canonical order; the first is the original.
    pub paths: Vec<PathBuf>,
}

/// Sorted, classified scan output.
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// Canonicalized scan root.
    pub root: PathBuf,
    pub entries: Vec<ReportEntry>,
    pub summary: Summary,
    pub skipped: Vec<SkippedFile>,
}

impl Report {
    /// True-duplicate groups (two or more files), in canonical order.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        let mut groups = Vec::new();
        let mut current: Option<DuplicateGroup> = None;
        for entry in &self.entries {
            match entry.kind {
                EntryKind::Original => {
                    if let Some(g) = current.take()
                        && g.paths.len() > 1
                    {
                        groups.push(g);
                    }
                    current = Some(DuplicateGroup {
                        digest: entry.digest.clone(),
                        size: entry.size,
                        paths: vec![entry.rel_path.clone()],
                    });
                }
                EntryKind::Duplicate => {
                    if let Some(g) = current.as_mut() {
                        g.paths.push(entry.rel_path.clone());
                    }
                }
                EntryKind::Collision => {}
            }
        }
        if let Some(g) = current
            && g.paths.len() > 1
        {
            groups.push(g);
        }
        groups
    }
}

/// Lib options for [`scan_dir`](crate::scan_dir).
#[derive(Clone, Debug, Default)]
pub struct ScanOpts {
    /// Override worker thread count. When None, host parallelism capped by the FD limit.
    pub num_threads: Option<usize>,
    pub algorithm: HashAlgorithm,
    pub policy: FailurePolicy,
    /// Byte-compare every duplicate against its group's original after classification.
    pub verify: bool,
}

impl From<&Opts> for ScanOpts {
    fn from(o: &Opts) -> Self {
        ScanOpts {
            num_threads: o.num_threads,
            algorithm: o.algorithm,
            policy: if o.keep_going {
                FailurePolicy::KeepGoing
            } else {
                FailurePolicy::FailFast
            },
            verify: o.verify,
        }
    }
}

/// Full options (CLI). Use [`ScanOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    pub num_threads: Option<usize>,
    pub algorithm: HashAlgorithm,
    pub keep_going: bool,
    pub verify: bool,
    /// Print duplicate groups instead of one line per file.
    pub groups: bool,
    /// Suppress throughput samples on stderr.
    pub quiet: bool,
    pub verbose: bool,
}
