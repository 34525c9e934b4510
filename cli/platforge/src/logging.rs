//! stderr logger for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record.level(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Step banners print bare; everything else carries its level.
fn format_record(level: Level, message: &str) -> String {
    match level {
        Level::Info => message.to_string(),
        Level::Warn => format!("warning: {message}"),
        Level::Error => format!("error: {message}"),
        Level::Debug => format!("[debug] {message}"),
        Level::Trace => format!("[trace] {message}"),
    }
}

/// Level for the `-v` count and `-q` flag.
pub fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. Only the first call has any effect.
pub fn init(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0, false), LevelFilter::Info);
        assert_eq!(level(1, false), LevelFilter::Debug);
        assert_eq!(level(3, false), LevelFilter::Trace);
        assert_eq!(level(0, true), LevelFilter::Warn);
    }

    #[test]
    fn record_format() {
        assert_eq!(format_record(Level::Info, "Compile [svm]"), "Compile [svm]");
        assert_eq!(format_record(Level::Warn, "x"), "warning: x");
        assert_eq!(format_record(Level::Debug, "cl /nologo"), "[debug] cl /nologo");
    }
}
