//! CLI command handler: scan, print the sorted listing to stdout and the summary to stderr.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::scan::scan_dir;
use crate::types::{Report, ScanOpts};
use crate::utils::setup_logging;

fn setup_opts(cli: &Cli) -> Opts {
    setup_logging(cli.verbose);
    Opts {
        num_threads: cli.threads.map(usize::from),
        algorithm: cli.algorithm,
        keep_going: cli.keep_going,
        verify: cli.verify,
        groups: cli.groups,
        quiet: cli.quiet,
        verbose: cli.verbose,
    }
}

/// Run a scan of `cli.dir`. Nothing is written to stdout unless the whole scan succeeds.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!("{:#?}", opts);
    let quiet = opts.quiet;
    let report = scan_dir(&cli.dir, &ScanOpts::from(&opts), |sample| {
        if !quiet {
            eprintln!("{sample}");
        }
    })
    .with_context(|| format!("scan {}", cli.dir.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    if opts.groups {
        write_groups(&mut out, &report)?;
    } else {
        write_listing(&mut out, &report)?;
    }
    out.flush().context("flush stdout")?;

    if !report.skipped.is_empty() {
        warn!("Skipped {} unreadable files", report.skipped.len());
        for s in &report.skipped {
            eprintln!("  skipped: {} ({})", s.path.display(), s.reason);
        }
    }
    print_summary(&report);
    Ok(())
}

/// Path bytes as stored by the OS, so names that are not valid UTF-8 stay distinct.
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    out.write_all(path.as_os_str().as_encoded_bytes())
}

/// One `<hex>\t<relative path>` line per file, canonical order.
pub fn write_listing<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for entry in &report.entries {
        write!(out, "{}\t", entry.digest)?;
        write_path(out, &entry.rel_path)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Each true-duplicate group as a `<hex>  <size> bytes` header followed by tab-indented paths.
pub fn write_groups<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for group in report.duplicate_groups() {
        writeln!(out, "{}  {} bytes", group.digest, group.size)?;
        for p in &group.paths {
            out.write_all(b"\t")?;
            write_path(out, p)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn print_summary(report: &Report) {
    let s = &report.summary;
    eprintln!("Duplicates: {}", s.duplicates);
    eprintln!("Duplicate MB: {:.2}", s.duplicate_mb());
    eprintln!("Collisions (at least): {}", s.collisions);
    eprintln!("Total MB: {:.2}", s.total_mb());
    if s.skipped > 0 {
        eprintln!("Skipped: {}", s.skipped);
    }
}
