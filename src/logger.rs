use std::io::Write;
use std::time::Instant;

use anstyle::{AnsiColor, Reset, Style};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;

struct ChainLogger {
    console: LevelFilter,
    file: Option<(Mutex<std::fs::File>, LevelFilter)>,
    color: bool,
    start: Instant,
}

impl ChainLogger {
    fn max_level(&self) -> LevelFilter {
        let file = self.file.as_ref().map_or(LevelFilter::Off, |(_, f)| *f);
        self.console.max(file)
    }
}

impl Log for ChainLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if record.level() <= self.console {
            let level = if self.color {
                let style = level_style(record.level());
                format!("{style}{}{Reset}", record.level())
            } else {
                record.level().to_string()
            };
            eprintln!("[{level}] {}", record.args());
        }

        if let Some((ref file, filter)) = self.file
            && record.level() <= filter
        {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some((ref file, _)) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Console level for a `-v` count: warnings by default, then info, debug and trace.
#[must_use]
pub fn verbosity_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Style used for a level tag on the console
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Blue,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().fg_color(Some(color.into()))
}

/// Initialize the global logger.
///
/// `RUST_LOG` overrides the console level. The log file, when given, receives every record
/// at `info` or above, or at the console level if that is more verbose.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger was already installed.
pub fn init(verbose: u8, log_file: Option<std::fs::File>, color: bool) -> Result<(), SetLoggerError> {
    let console = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| verbosity_filter(verbose));

    let logger = ChainLogger {
        console,
        file: log_file.map(|f| (Mutex::new(f), console.max(LevelFilter::Info))),
        color,
        start: Instant::now(),
    };
    let max_level = logger.max_level();

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_filter(0), LevelFilter::Warn);
        assert_eq!(verbosity_filter(1), LevelFilter::Info);
        assert_eq!(verbosity_filter(2), LevelFilter::Debug);
        assert_eq!(verbosity_filter(9), LevelFilter::Trace);
    }

    #[test]
    fn test_file_level_includes_info() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::fs::File::create(dir.path().join("log.txt")).unwrap();
        let logger = ChainLogger {
            console: LevelFilter::Warn,
            file: Some((Mutex::new(file), LevelFilter::Info)),
            color: false,
            start: Instant::now(),
        };
        assert_eq!(logger.max_level(), LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("cmdchain::chain")
                .args(format_args!("Executing foo:hello command itself first:"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert!(
            written.ends_with("[INFO] cmdchain::chain - Executing foo:hello command itself first:\n"),
            "got: {written}"
        );
    }
}
