//! File hashing utilities

use blake3::Hasher as Blake3;
use sha1::{Digest as _, Sha1};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::ScanError;
use crate::types::{Digest, HashAlgorithm};
use crate::utils::config::HashingConsts;

/// Running hash state for one of the supported algorithms.
enum FileHasher {
    Sha1(Sha1),
    Blake3(Box<Blake3>),
}

impl FileHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha1 => FileHasher::Sha1(Sha1::new()),
            HashAlgorithm::Blake3 => FileHasher::Blake3(Box::new(Blake3::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            FileHasher::Sha1(h) => h.update(data),
            FileHasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            FileHasher::Sha1(h) => Digest::new(h.finalize().as_slice()),
            FileHasher::Blake3(h) => Digest::new(h.finalize().as_bytes()),
        }
    }
}

/// Stream `path` through `algorithm` in fixed-size chunks. Returns the digest and the number of bytes read.
/// Any open or read error (including one mid-stream) yields [`ScanError::Io`] and no digest.
pub fn digest_file(path: &Path, algorithm: HashAlgorithm) -> Result<(Digest, u64), ScanError> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    digest_reader(file, algorithm).map_err(|e| ScanError::io(path, e))
}

/// Hash everything `reader` yields. Interrupted reads are retried.
pub fn digest_reader<R: Read>(mut reader: R, algorithm: HashAlgorithm) -> std::io::Result<(Digest, u64)> {
    let mut hasher = FileHasher::new(algorithm);
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    let mut total = 0_u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
        total += n as u64;
    }
    Ok((hasher.finalize(), total))
}

/// Byte-for-byte comparison of two files.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, ScanError> {
    let open = |p: &Path| {
        File::open(p)
            .map(|f| BufReader::with_capacity(HashingConsts::VERIFY_CHUNK_SIZE, f))
            .map_err(|e| ScanError::io(p, e))
    };
    let mut ra = open(a)?;
    let mut rb = open(b)?;
    loop {
        let ba = ra.fill_buf().map_err(|e| ScanError::io(a, e))?;
        let bb = rb.fill_buf().map_err(|e| ScanError::io(b, e))?;
        if ba.is_empty() || bb.is_empty() {
            return Ok(ba.is_empty() && bb.is_empty());
        }
        let n = ba.len().min(bb.len());
        if ba[..n] != bb[..n] {
            return Ok(false);
        }
        ra.consume(n);
        rb.consume(n);
    }
}
