//! Runtime-adjustable log severity
//!
//! - `level`: the [`LevelSink`] seam the debug server reads and writes, the
//!   atomic [`ReconfigurableLevel`] implementation, and level-name parsing
//! - `logger`: a `log::Log` wrapper that gates an `env_logger` backend on a
//!   [`ReconfigurableLevel`]

pub mod level;
pub mod logger;

pub use level::{level_name, parse_level, LevelSink, ReconfigurableLevel};
pub use logger::{init, ReconfigurableLogger};
