use crate::error::io::IoError;
use slog::{Drain, Level, Logger};
use std::path::PathBuf;

/// The logging mode to use.
pub enum LoggingMode {
    /// Undecorated output to STDERR.
    Stderr,

    /// Full records, with timestamps, to a file.
    File(PathBuf),

    /// Drop everything.
    Discard,
}

/// A Slog formatter that writes to a term decorator.
pub struct PlainFormat<D>
where
    D: slog_term::Decorator,
{
    decorator: D,
}

impl<D: slog_term::Decorator> PlainFormat<D> {
    pub fn new(decorator: D) -> PlainFormat<D> {
        PlainFormat { decorator }
    }
}

impl<D: slog_term::Decorator> slog::Drain for PlainFormat<D> {
    type Ok = ();
    type Err = std::io::Error;

    fn log(
        &self,
        record: &slog::Record<'_>,
        values: &slog::OwnedKVList,
    ) -> Result<Self::Ok, Self::Err> {
        self.decorator.with_record(record, values, |decorator| {
            if record.level() <= slog::Level::Warning {
                decorator.start_level()?;
                write!(decorator, "{}: ", record.level().as_str())?;
                // start_whitespace resets to normal coloring after printing the level
                decorator.start_whitespace()?;
            }

            decorator.start_msg()?;
            write!(decorator, "{}", record.msg())?;

            decorator.start_whitespace()?;
            writeln!(decorator)?;

            decorator.flush()?;
            Ok(())
        })
    }
}

fn create_drain(mode: LoggingMode) -> Result<Logger, IoError> {
    let logger = match mode {
        LoggingMode::Stderr => {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            let drain = PlainFormat::new(decorator).fuse();
            Logger::root(slog_async::Async::new(drain).build().fuse(), slog::o!())
        }
        LoggingMode::File(out) => {
            let file = crate::fs::create_file(&out)?;
            let decorator = slog_term::PlainDecorator::new(file);
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            Logger::root(slog_async::Async::new(drain).build().fuse(), slog::o!())
        }
        LoggingMode::Discard => Logger::root(slog::Discard, slog::o!()),
    };
    Ok(logger)
}

/// Create a root logger.
/// The verbose_level can be negative, in which case it's a quiet mode which removes warnings,
/// then errors entirely.
pub fn create_root_logger(verbose_level: i64, mode: LoggingMode) -> Result<Logger, IoError> {
    let log_level = match verbose_level {
        -3 => Level::Critical,
        -2 => Level::Error,
        -1 => Level::Warning,
        0 => Level::Info,
        1 => Level::Debug,
        x if x > 0 => Level::Trace,
        _ => return Ok(Logger::root(slog::Discard, slog::o!())),
    };

    let drain = slog::LevelFilter::new(create_drain(mode)?, log_level).fuse();
    Ok(Logger::root(
        drain,
        slog::o!("component" => env!("CARGO_PKG_NAME"), "version" => env!("CARGO_PKG_VERSION")),
    ))
}
