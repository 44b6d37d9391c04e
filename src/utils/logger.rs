//! stderr logger. Report output goes to stdout, so everything here stays off it.

use colored::{ColoredString, Colorize};
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, Record};
use std::io::Write;

const NAME: &str = env!("CARGO_PKG_NAME");

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".dimmed(),
    }
}

fn format_line(record: &Record) -> String {
    match record.level() {
        Level::Info => format!("[{}] {}", NAME.cyan(), record.args()),
        Level::Error | Level::Warn => {
            format!("[{} {}] {}", NAME.cyan(), level_tag(record.level()), record.args())
        }
        Level::Debug | Level::Trace => format!(
            "[{} {} {}] {}",
            NAME.cyan(),
            level_tag(record.level()),
            record.target().dimmed(),
            record.args()
        ),
    }
}

/// Our crate logs at Info, or Debug with `verbose`; dependencies only at Warn. `RUST_LOG` applies on top.
/// Safe to call more than once: later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module(NAME, level)
        .format(|buf, record| writeln!(buf, "{}", format_line(record)))
        .try_init();
}
