//! `log::Log` wrapper gated by a [`ReconfigurableLevel`]

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::level::ReconfigurableLevel;

/// Forwards records to `inner` only while they pass the shared threshold.
///
/// `inner` keeps its own filtering (e.g. `RUST_LOG` module directives);
/// the threshold is applied on top of it.
pub struct ReconfigurableLogger<L> {
    inner: L,
    level: ReconfigurableLevel,
}

impl<L: Log> ReconfigurableLogger<L> {
    pub fn new(inner: L, level: ReconfigurableLevel) -> Self {
        Self { inner, level }
    }

    /// Handle to the threshold this logger is gated on
    #[must_use]
    pub fn level(&self) -> &ReconfigurableLevel {
        &self.level
    }
}

impl<L: Log> Log for ReconfigurableLogger<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.level.enabled(metadata.level()) && self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.level.enabled(record.level()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install an `env_logger` backend behind a reconfigurable threshold.
///
/// The backend accepts every level unless `RUST_LOG` narrows it, so the
/// returned handle is what decides. Pass it to the debug server to expose it
/// on `/log-level`.
///
/// # Errors
/// Fails if a global logger is already installed
pub fn init(initial: LevelFilter) -> Result<ReconfigurableLevel, SetLoggerError> {
    let inner = env_logger::Builder::new().filter_level(LevelFilter::Trace).parse_default_env().build();
    let max = inner.filter();

    let level = ReconfigurableLevel::new(initial);
    log::set_boxed_logger(Box::new(ReconfigurableLogger::new(inner, level.clone())))?;
    log::set_max_level(max);

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LevelSink;
    use log::Level;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.lines.lock().unwrap().push(format!("{} {}", record.level(), record.args()));
        }

        fn flush(&self) {}
    }

    fn emit(logger: &impl Log, level: Level, msg: &str) {
        logger.log(&Record::builder().level(level).args(format_args!("{msg}")).build());
    }

    #[test]
    fn test_gates_below_threshold() {
        let capture = Capture::default();
        let logger =
            ReconfigurableLogger::new(capture.clone(), ReconfigurableLevel::new(LevelFilter::Info));

        emit(&logger, Level::Error, "kept");
        emit(&logger, Level::Info, "kept too");
        emit(&logger, Level::Debug, "dropped");

        let lines = capture.lines.lock().unwrap();
        assert_eq!(*lines, vec!["ERROR kept".to_string(), "INFO kept too".to_string()]);
    }

    #[test]
    fn test_follows_threshold_changes() {
        let capture = Capture::default();
        let level = ReconfigurableLevel::new(LevelFilter::Off);
        let logger = ReconfigurableLogger::new(capture.clone(), level.clone());

        emit(&logger, Level::Error, "before");
        level.set_min_level(LevelFilter::Debug);
        emit(&logger, Level::Debug, "after");

        assert_eq!(*capture.lines.lock().unwrap(), vec!["DEBUG after".to_string()]);
        assert!(logger.enabled(&Metadata::builder().level(Level::Debug).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Trace).build()));
    }
}
