//! Minimum-severity holder shared between the logger and the debug server

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{Level, LevelFilter};

use crate::domain::ParseLevelError;

/// Indexed by `LevelFilter as usize`
const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Read/write access to the minimum severity a logger currently emits.
///
/// The debug server only ever goes through this trait. Implementations own
/// their synchronization: concurrent `/log-level` requests call these
/// methods from different tasks at the same time.
pub trait LevelSink: Send + Sync + 'static {
    fn min_level(&self) -> LevelFilter;

    fn set_min_level(&self, level: LevelFilter);
}

impl<S: LevelSink + ?Sized> LevelSink for Arc<S> {
    fn min_level(&self) -> LevelFilter {
        (**self).min_level()
    }

    fn set_min_level(&self, level: LevelFilter) {
        (**self).set_min_level(level);
    }
}

/// Cloneable handle to one atomic threshold.
///
/// Every clone observes and updates the same value.
#[derive(Debug, Clone)]
pub struct ReconfigurableLevel {
    level: Arc<AtomicUsize>,
}

impl ReconfigurableLevel {
    #[must_use]
    pub fn new(initial: LevelFilter) -> Self {
        Self { level: Arc::new(AtomicUsize::new(initial as usize)) }
    }

    /// Whether a record at `level` passes the current threshold
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.min_level()
    }
}

impl Default for ReconfigurableLevel {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl LevelSink for ReconfigurableLevel {
    fn min_level(&self) -> LevelFilter {
        let idx = self.level.load(Ordering::Acquire);
        LEVELS.get(idx).copied().unwrap_or(LevelFilter::Trace)
    }

    fn set_min_level(&self, level: LevelFilter) {
        self.level.store(level as usize, Ordering::Release);
    }
}

/// Parse a level as written by an operator.
///
/// Accepts the `log` names (`off`, `error`, `warn`, `info`, `debug`,
/// `trace`) in any case, their first letter, or the ordinal `0..=5`.
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [`ParseLevelError`] carrying the trimmed input for anything else
pub fn parse_level(input: &str) -> Result<LevelFilter, ParseLevelError> {
    let trimmed = input.trim();
    let invalid = || ParseLevelError(trimmed.to_string());

    if let Ok(ordinal) = trimmed.parse::<usize>() {
        return LEVELS.get(ordinal).copied().ok_or_else(invalid);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "o" => Ok(LevelFilter::Off),
        "e" => Ok(LevelFilter::Error),
        "w" => Ok(LevelFilter::Warn),
        "i" => Ok(LevelFilter::Info),
        "d" => Ok(LevelFilter::Debug),
        "t" => Ok(LevelFilter::Trace),
        name => LevelFilter::from_str(name).map_err(|_| invalid()),
    }
}

/// Lowercase name of a level, as served by `GET /log-level`
#[must_use]
pub fn level_name(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}
