//! Duplicate classification: canonical sort, then one pass grouping equal digests.

use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::engine::hashing::files_identical;
use crate::engine::tools::{canonical_order, path_relative_to};
use crate::error::ScanError;
use crate::types::{EntryKind, FileResult, Report, ReportEntry, SkippedFile, Summary};

/// Sort results by digest bytes, then path bytes. Paths are unique, so the order is total.
pub fn sort_canonical(results: &mut [FileResult]) {
    results.par_sort_unstable_by(canonical_order);
}

/// Sort `results` canonically and classify each entry against the first entry of its digest run:
/// same size is a duplicate, different size is a collision. Results without a digest are dropped.
pub fn classify(mut results: Vec<FileResult>, root: &Path, skipped: Vec<SkippedFile>) -> Report {
    sort_canonical(&mut results);

    let mut summary = Summary {
        skipped: skipped.len(),
        ..Summary::default()
    };
    let mut entries: Vec<ReportEntry> = Vec::with_capacity(results.len());
    let mut run_start: Option<usize> = None;

    for result in results {
        let Some(digest) = result.digest else {
            continue;
        };
        summary.files += 1;
        summary.total_bytes += result.size;

        let kind = match run_start.map(|i: usize| &entries[i]) {
            Some(first) if first.digest == digest => {
                if result.size == first.size {
                    summary.duplicates += 1;
                    summary.duplicate_bytes += result.size;
                    EntryKind::Duplicate
                } else {
                    summary.collisions += 1;
                    EntryKind::Collision
                }
            }
            _ => {
                run_start = Some(entries.len());
                EntryKind::Original
            }
        };

        let rel_path = relative_or_absolute(&result.path, root);
        entries.push(ReportEntry {
            digest,
            path: result.path,
            rel_path,
            size: result.size,
            kind,
        });
    }

    debug!(
        "classified {} files: {} duplicates, {} collisions",
        summary.files, summary.duplicates, summary.collisions
    );

    Report {
        root: root.to_path_buf(),
        entries,
        summary,
        skipped,
    }
}

fn relative_or_absolute(path: &Path, root: &Path) -> PathBuf {
    path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf())
}

/// Byte-compare every duplicate with the original of its run. Entries whose bytes differ are
/// reclassified as collisions and the summary adjusted. Returns how many were reclassified.
pub fn verify_duplicates(report: &mut Report) -> Result<usize, ScanError> {
    let mut original: Option<PathBuf> = None;
    let mut reclassified = 0_usize;
    for entry in report.entries.iter_mut() {
        match entry.kind {
            EntryKind::Original => original = Some(entry.path.clone()),
            EntryKind::Duplicate => {
                let Some(first) = original.as_deref() else {
                    continue;
                };
                if !files_identical(first, &entry.path)? {
                    debug!(
                        "digest match but content differs: {} vs {}",
                        first.display(),
                        entry.path.display()
                    );
                    entry.kind = EntryKind::Collision;
                    report.summary.duplicates -= 1;
                    report.summary.duplicate_bytes -= entry.size;
                    report.summary.collisions += 1;
                    reclassified += 1;
                }
            }
            EntryKind::Collision => {}
        }
    }
    Ok(reclassified)
}
