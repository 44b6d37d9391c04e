//! End-to-end scans over temporary trees, plus the walk, worker and collector stages in isolation.

use crossbeam_channel::{bounded, unbounded};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sumdir::engine::{canonical_order, files_identical, running_as_root, verify_duplicates};
use sumdir::pipeline::{
    Collected, WalkOutcome, collect_results, run_walk_loop, shutdown_pipeline_handles,
    spawn_hash_workers, walk_files,
};
use sumdir::{
    Digest, EntryKind, FailurePolicy, FileResult, HashAlgorithm, Report, ScanError, ScanOpts,
    scan_dir,
};

const SHA1_HELLO: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
const SHA1_WORLD: &str = "7c211433f02071597741e6ff5a8ea34789abbf43";

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn scan_with(root: &Path, opts: &ScanOpts) -> Result<Report, ScanError> {
    scan_dir(root, opts, |_| {})
}

fn scan(root: &Path) -> Report {
    scan_with(root, &ScanOpts::default()).unwrap()
}

fn listing(report: &Report) -> Vec<(String, PathBuf)> {
    report
        .entries
        .iter()
        .map(|e| (e.digest.to_hex(), e.rel_path.clone()))
        .collect()
}

/// Tree with nested dirs, duplicates across levels, an empty file and hidden entries.
fn sample_tree() -> (TempDir, usize) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let mut visible = 0;
    for i in 0..20 {
        write(root, &format!("d{}/sub{}/f{i}.bin", i % 3, i % 2), format!("content {}", i % 7).as_bytes());
        visible += 1;
    }
    write(root, "top.txt", b"hello");
    write(root, "deep/a/b/c/d/e/leaf.txt", b"hello");
    write(root, "empty", b"");
    visible += 3;
    write(root, ".hidden", b"secret");
    write(root, ".cache/blob", b"cached");
    write(root, "d0/.git/objects/xx", b"object");
    (tmp, visible)
}

// --- scenarios ---

#[test]
fn test_scenario_duplicates_listed_and_counted() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.txt", b"hello");
    write(tmp.path(), "b.txt", b"hello");
    write(tmp.path(), "c.txt", b"world");

    let report = scan(tmp.path());
    assert_eq!(
        listing(&report),
        vec![
            (SHA1_WORLD.to_string(), PathBuf::from("c.txt")),
            (SHA1_HELLO.to_string(), PathBuf::from("a.txt")),
            (SHA1_HELLO.to_string(), PathBuf::from("b.txt")),
        ]
    );
    assert_eq!(report.summary.files, 3);
    assert_eq!(report.summary.duplicates, 1);
    assert_eq!(report.summary.duplicate_bytes, 5);
    assert_eq!(report.summary.collisions, 0);
    assert_eq!(report.summary.total_bytes, 15);
}

#[test]
fn test_scenario_hidden_dir_excluded() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".git/x", b"x");
    write(tmp.path(), "y.txt", b"y");

    let report = scan(tmp.path());
    let paths: Vec<_> = report.entries.iter().map(|e| e.rel_path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("y.txt")]);
}

#[test]
fn test_hidden_root_is_scanned() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".cfg/a", b"a");
    write(tmp.path(), ".cfg/.cache/b", b"b");

    let report = scan(&tmp.path().join(".cfg"));
    let paths: Vec<_> = report.entries.iter().map(|e| e.rel_path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("a")]);
}

#[test]
fn test_missing_root() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    match scan_with(&missing, &ScanOpts::default()) {
        Err(ScanError::PathNotFound(p)) => assert_eq!(p, missing),
        other => panic!("expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn test_root_is_a_file() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "f", b"f");
    assert!(matches!(
        scan_with(&file, &ScanOpts::default()),
        Err(ScanError::InvalidArgument(_))
    ));
}

#[test]
fn test_empty_root() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("empty_dir")).unwrap();
    let report = scan(tmp.path());
    assert!(report.entries.is_empty());
    assert_eq!(report.summary.files, 0);
}

// --- properties ---

#[test]
fn test_result_count_matches_visible_files() {
    let (tmp, visible) = sample_tree();
    let report = scan(tmp.path());
    assert_eq!(report.entries.len(), visible);
    assert!(report.entries.iter().all(|e| {
        e.rel_path
            .components()
            .all(|c| !c.as_os_str().to_string_lossy().starts_with('.'))
    }));
}

#[test]
fn test_report_is_in_canonical_order() {
    let (tmp, _) = sample_tree();
    let report = scan(tmp.path());
    for pair in report.entries.windows(2) {
        let a = FileResult::hashed(pair[0].path.clone(), pair[0].digest.clone(), 0);
        let b = FileResult::hashed(pair[1].path.clone(), pair[1].digest.clone(), 0);
        assert_eq!(canonical_order(&a, &b), std::cmp::Ordering::Less);
    }
}

#[test]
fn test_same_output_for_any_worker_count() {
    let (tmp, _) = sample_tree();
    let run = |n: usize| {
        let opts = ScanOpts {
            num_threads: Some(n),
            ..ScanOpts::default()
        };
        let report = scan_with(tmp.path(), &opts).unwrap();
        (listing(&report), report.summary)
    };
    let single = run(1);
    assert_eq!(run(2), single);
    assert_eq!(run(8), single);
    assert_eq!(run(64), single);
}

#[test]
fn test_duplicate_count_matches_groups() {
    let (tmp, _) = sample_tree();
    let report = scan(tmp.path());
    let from_groups: usize = report
        .duplicate_groups()
        .iter()
        .map(|g| g.paths.len() - 1)
        .sum();
    assert_eq!(report.summary.duplicates, from_groups);
    // 20 files over 7 distinct contents, plus "hello" twice.
    assert_eq!(report.summary.duplicates, 13 + 1);
}

#[test]
fn test_blake3_digests() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a", b"hello");
    let opts = ScanOpts {
        algorithm: HashAlgorithm::Blake3,
        ..ScanOpts::default()
    };
    let report = scan_with(tmp.path(), &opts).unwrap();
    assert_eq!(
        report.entries[0].digest.as_bytes(),
        blake3::hash(b"hello").as_bytes()
    );
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped() {
    let tmp = TempDir::new().unwrap();
    let target = write(tmp.path(), "real.txt", b"real");
    std::os::unix::fs::symlink(&target, tmp.path().join("link.txt")).unwrap();
    std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop")).unwrap();
    let report = scan(tmp.path());
    let paths: Vec<_> = report.entries.iter().map(|e| e.rel_path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("real.txt")]);
}

// --- failure policy ---

/// Permission bits do not stop root, so those cases cannot fail the way they should.
#[cfg(unix)]
fn skip_as_root() -> bool {
    let root = running_as_root();
    if root {
        eprintln!("skipped: running as root, permission bits are not enforced");
    }
    root
}

/// Walk stage fed from `outcomes`, real hash workers and the collector, joined like `scan_dir` does.
fn run_stages(outcomes: Vec<WalkOutcome>, policy: FailurePolicy) -> Result<Collected, ScanError> {
    let (job_tx, job_rx) = bounded(0);
    let (result_tx, result_rx) = bounded(256);
    let workers = spawn_hash_workers(job_rx, &result_tx, 2, HashAlgorithm::Sha1);
    let walk = {
        let result_tx = result_tx.clone();
        std::thread::spawn(move || run_walk_loop(job_tx, result_tx, outcomes.into_iter()))
    };
    drop(result_tx);

    let collected = collect_results(result_rx, policy, |_| {});
    shutdown_pipeline_handles(walk, workers).unwrap();
    collected
}

#[test]
fn test_vanished_file_fails_fast() {
    let tmp = TempDir::new().unwrap();
    let outcomes = vec![
        WalkOutcome::File(write(tmp.path(), "a", b"hello")),
        WalkOutcome::File(tmp.path().join("vanished")),
        WalkOutcome::File(write(tmp.path(), "c", b"hello")),
    ];
    match run_stages(outcomes, FailurePolicy::FailFast) {
        Err(ScanError::Io { path, source }) => {
            assert_eq!(path.file_name().unwrap(), "vanished");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        Err(other) => panic!("expected Io error, got {other:?}"),
        Ok(_) => panic!("expected Io error"),
    }
}

#[test]
fn test_vanished_file_skipped_when_keep_going() {
    let tmp = TempDir::new().unwrap();
    let outcomes = vec![
        WalkOutcome::File(write(tmp.path(), "a", b"hello")),
        WalkOutcome::File(tmp.path().join("vanished")),
        WalkOutcome::File(write(tmp.path(), "c", b"hello")),
    ];
    let collected = run_stages(outcomes, FailurePolicy::KeepGoing).unwrap();
    assert_eq!(collected.results.len(), 2);
    assert_eq!(collected.skipped.len(), 1);
    assert_eq!(collected.skipped[0].path.file_name().unwrap(), "vanished");
}

#[test]
fn test_traversal_error_aborts_running_pipeline() {
    let tmp = TempDir::new().unwrap();
    let mut outcomes: Vec<_> = (0..8)
        .map(|i| WalkOutcome::File(write(tmp.path(), &format!("f{i}"), b"hello")))
        .collect();
    outcomes.push(WalkOutcome::Err(ScanError::PermissionDenied(tmp.path().join("locked"))));
    outcomes.push(WalkOutcome::File(write(tmp.path(), "after", b"after")));

    match run_stages(outcomes, FailurePolicy::KeepGoing) {
        Err(ScanError::PermissionDenied(p)) => assert_eq!(p.file_name().unwrap(), "locked"),
        Err(other) => panic!("expected PermissionDenied, got {other:?}"),
        Ok(_) => panic!("expected PermissionDenied"),
    }
}

#[cfg(unix)]
fn make_unreadable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
}

#[cfg(unix)]
fn make_readable(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_fails_fast() {
    if skip_as_root() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ok.txt", b"ok");
    let locked = write(tmp.path(), "locked.txt", b"locked");
    make_unreadable(&locked);

    let result = scan_with(tmp.path(), &ScanOpts::default());
    make_readable(&locked, 0o644);
    match result {
        Err(ScanError::Io { path, source }) => {
            assert_eq!(path.file_name().unwrap(), "locked.txt");
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_skipped_when_keep_going() {
    if skip_as_root() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ok.txt", b"ok");
    write(tmp.path(), "also_ok.txt", b"ok");
    let locked = write(tmp.path(), "locked.txt", b"locked");
    make_unreadable(&locked);

    let opts = ScanOpts {
        policy: FailurePolicy::KeepGoing,
        ..ScanOpts::default()
    };
    let result = scan_with(tmp.path(), &opts);
    make_readable(&locked, 0o644);
    let report = result.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.summary.duplicates, 1);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.skipped[0].path.file_name().unwrap(), "locked.txt");
}

#[cfg(unix)]
#[test]
fn test_unreadable_dir_aborts_even_when_keep_going() {
    if skip_as_root() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a/ok.txt", b"ok");
    let locked = tmp.path().join("b");
    write(tmp.path(), "b/inner.txt", b"inner");
    write(tmp.path(), "c/after.txt", b"after");
    make_unreadable(&locked);

    let opts = ScanOpts {
        policy: FailurePolicy::KeepGoing,
        num_threads: Some(2),
        ..ScanOpts::default()
    };
    let result = scan_with(tmp.path(), &opts);
    make_readable(&locked, 0o755);
    match result {
        Err(ScanError::PermissionDenied(p)) => assert_eq!(p.file_name().unwrap(), "b"),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
}

// --- verify ---

#[test]
fn test_verify_keeps_true_duplicates() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a", b"same bytes");
    write(tmp.path(), "b", b"same bytes");
    let opts = ScanOpts {
        verify: true,
        ..ScanOpts::default()
    };
    let report = scan_with(tmp.path(), &opts).unwrap();
    assert_eq!(report.summary.duplicates, 1);
    assert_eq!(report.summary.collisions, 0);
}

#[test]
fn test_verify_reclassifies_forged_digest_match() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "a", b"aaaa");
    let b = write(tmp.path(), "b", b"bbbb");
    let forged = Digest::new(&[0xab; 20]);
    let results = vec![
        FileResult::hashed(a, forged.clone(), 4),
        FileResult::hashed(b, forged, 4),
    ];
    let mut report = sumdir::engine::classify(results, tmp.path(), Vec::new());
    assert_eq!(report.summary.duplicates, 1);

    assert_eq!(verify_duplicates(&mut report).unwrap(), 1);
    assert_eq!(report.entries[1].kind, EntryKind::Collision);
    assert_eq!(report.summary.duplicates, 0);
    assert_eq!(report.summary.duplicate_bytes, 0);
    assert_eq!(report.summary.collisions, 1);
    assert!(report.duplicate_groups().is_empty());
}

#[test]
fn test_files_identical() {
    let tmp = TempDir::new().unwrap();
    let big = vec![3u8; 600 * 1024];
    let mut big_changed = big.clone();
    *big_changed.last_mut().unwrap() = 4;
    let a = write(tmp.path(), "a", &big);
    let b = write(tmp.path(), "b", &big);
    let c = write(tmp.path(), "c", &big_changed);
    let d = write(tmp.path(), "d", &big[..1000]);
    assert!(files_identical(&a, &b).unwrap());
    assert!(!files_identical(&a, &c).unwrap());
    assert!(!files_identical(&a, &d).unwrap());
    assert!(files_identical(&a, &tmp.path().join("missing")).is_err());
}

// --- stages ---

#[test]
fn test_walk_files_depth_first_sorted() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "c/y", b"");
    write(tmp.path(), "b", b"");
    write(tmp.path(), "a/x", b"");
    write(tmp.path(), "a/.skip/z", b"");
    let files: Vec<_> = walk_files(tmp.path().to_path_buf())
        .map(|o| match o {
            WalkOutcome::File(p) => p.strip_prefix(tmp.path()).unwrap().to_path_buf(),
            WalkOutcome::Err(e) => panic!("walk error: {e}"),
        })
        .collect();
    assert_eq!(
        files,
        vec![PathBuf::from("a/x"), PathBuf::from("b"), PathBuf::from("c/y")]
    );
}

#[test]
fn test_walk_loop_stops_at_first_error() {
    let (job_tx, job_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();
    let outcomes = vec![
        WalkOutcome::File(PathBuf::from("/r/one")),
        WalkOutcome::Err(ScanError::PermissionDenied(PathBuf::from("/r/locked"))),
        WalkOutcome::File(PathBuf::from("/r/two")),
    ];
    let sent = run_walk_loop(job_tx, result_tx, outcomes.into_iter());
    assert_eq!(sent, 1);

    let jobs: Vec<_> = job_rx.iter().collect();
    assert_eq!(jobs, vec![PathBuf::from("/r/one")]);
    let results: Vec<_> = result_rx.iter().collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_traversal_failure());
}

#[test]
fn test_walk_loop_stops_when_workers_gone() {
    let (job_tx, job_rx) = bounded(0);
    let (result_tx, _result_rx) = unbounded();
    drop(job_rx);
    let outcomes = vec![WalkOutcome::File(PathBuf::from("/r/one"))];
    assert_eq!(run_walk_loop(job_tx, result_tx, outcomes.into_iter()), 0);
}

#[test]
fn test_workers_emit_one_result_per_job() {
    let tmp = TempDir::new().unwrap();
    let (job_tx, job_rx) = bounded(0);
    let (result_tx, result_rx) = bounded(4);
    let handles = spawn_hash_workers(job_rx, &result_tx, 3, HashAlgorithm::Sha1);
    drop(result_tx);

    let mut paths = Vec::new();
    for i in 0..10 {
        paths.push(write(tmp.path(), &format!("f{i}"), b"hello"));
    }
    paths.push(tmp.path().join("missing"));
    let feeder = {
        let paths = paths.clone();
        std::thread::spawn(move || {
            for p in paths {
                job_tx.send(p).unwrap();
            }
        })
    };

    // Channel closes only once all three workers have exited.
    let results: Vec<FileResult> = result_rx.iter().collect();
    feeder.join().unwrap();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(results.len(), paths.len());
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].digest.is_none());
    assert!(
        results
            .iter()
            .filter(|r| r.error.is_none())
            .all(|r| r.digest.as_ref().unwrap().to_hex() == SHA1_HELLO && r.size == 5)
    );
}

#[test]
fn test_collector_fail_fast_returns_first_error() {
    let (tx, rx) = unbounded();
    tx.send(FileResult::hashed(PathBuf::from("/r/a"), Digest::new(&[1]), 1)).unwrap();
    tx.send(FileResult::failed(
        PathBuf::from("/r/b"),
        ScanError::io(Path::new("/r/b"), std::io::Error::other("boom")),
    ))
    .unwrap();
    tx.send(FileResult::hashed(PathBuf::from("/r/c"), Digest::new(&[1]), 1)).unwrap();
    drop(tx);

    let err = collect_results(rx, FailurePolicy::FailFast, |_| {}).unwrap_err();
    assert!(matches!(err, ScanError::Io { ref path, .. } if path == Path::new("/r/b")));
}

#[test]
fn test_collector_keep_going_records_skipped() {
    let (tx, rx) = unbounded();
    tx.send(FileResult::failed(
        PathBuf::from("/r/b"),
        ScanError::io(Path::new("/r/b"), std::io::Error::other("boom")),
    ))
    .unwrap();
    tx.send(FileResult::hashed(PathBuf::from("/r/a"), Digest::new(&[1]), 1)).unwrap();
    drop(tx);

    let collected = collect_results(rx, FailurePolicy::KeepGoing, |_| {}).unwrap();
    assert_eq!(collected.results.len(), 1);
    assert_eq!(collected.skipped.len(), 1);
    assert_eq!(collected.skipped[0].path, PathBuf::from("/r/b"));
    assert!(collected.skipped[0].reason.contains("boom"));
}

#[test]
fn test_collector_keep_going_still_aborts_on_traversal_failure() {
    let (tx, rx) = unbounded();
    tx.send(FileResult::traversal_failed(ScanError::PermissionDenied(
        PathBuf::from("/r/locked"),
    )))
    .unwrap();
    drop(tx);
    assert!(matches!(
        collect_results(rx, FailurePolicy::KeepGoing, |_| {}),
        Err(ScanError::PermissionDenied(_))
    ));
}
