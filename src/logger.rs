//! A tiny stderr logger for the `penwork` binary. The library itself only
//! talks to the `log` facade.
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;

pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> StderrLogger {
        StderrLogger { level }
    }

    /// Maps a count of `-v` flags to a level: warnings only, then info,
    /// debug and trace.
    pub fn level_for(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Install as the global logger. Only the first call wins.
    pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(StderrLogger::new(level)))
            .map(|()| log::set_max_level(level))
    }

    fn format(record: &Record) -> String {
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        format!("{} [{}] {}", tag, record.target(), record.args())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Nowhere to report a failed write to stderr.
            let _ = writeln!(std::io::stderr(), "{}", StderrLogger::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
