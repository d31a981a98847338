//! Stderr logger for the binary
//!
//! The library only emits `log` records; installing a logger is left to
//! the host. This one prints `[calheat] Warning: ...` lines.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_line(record.level(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn format_line(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("[calheat] Error: {}", message),
        Level::Warn => format!("[calheat] Warning: {}", message),
        Level::Info => format!("[calheat] {}", message),
        Level::Debug | Level::Trace => format!("[calheat] {}: {}", level, message),
    }
}

/// Install the stderr logger; `verbose` lowers the threshold to debug
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    Ok(())
}
