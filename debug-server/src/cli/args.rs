//! CLI argument definitions

use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::logging::parse_level;
use crate::server::DebugConfig;

/// Debug server flags, to `#[command(flatten)]` into an application's parser
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DebugArgs {
    /// Address to serve /debug/pprof and /log-level on (empty: disabled)
    #[arg(long = "debugAddr", id = "debugAddr", value_name = "HOST:PORT")]
    pub debug_addr: Option<String>,
}

impl DebugArgs {
    /// Server configuration, or `None` when no address was given
    #[must_use]
    pub fn config(&self) -> Option<DebugConfig> {
        self.debug_addr.as_deref().filter(|addr| !addr.is_empty()).map(DebugConfig::new)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "debug-server",
    about = "Serve runtime profiles and a log-level control endpoint",
    after_help = "\
EXAMPLES:
    debug-server --debugAddr 127.0.0.1:6060
    curl http://127.0.0.1:6060/debug/pprof/threads
    curl -X PUT -d debug http://127.0.0.1:6060/log-level"
)]
pub struct Args {
    #[command(flatten)]
    pub debug: DebugArgs,

    /// Initial minimum log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Seconds between heartbeat log lines at every level (0 = none)
    #[arg(long, default_value = "5")]
    pub heartbeat: u64,

    /// Longest CPU profile a request may ask for, in seconds
    #[arg(long, default_value = "60")]
    pub max_profile_seconds: u64,
}

impl Args {
    /// Debug server configuration with this binary's overrides applied
    #[must_use]
    pub fn debug_config(&self) -> Option<DebugConfig> {
        let max = Duration::from_secs(self.max_profile_seconds);
        self.debug.config().map(|config| config.with_max_profile_duration(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::debug_address;
    use clap::{CommandFactory, FromArgMatches};

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["debug-server"]).unwrap();
        assert!(args.debug.config().is_none());
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.heartbeat, 5);
    }

    #[test]
    fn test_empty_address_disables() {
        let args = Args::try_parse_from(["debug-server", "--debugAddr", ""]).unwrap();
        assert!(args.debug_config().is_none());
    }

    #[test]
    fn test_full_config() {
        let args = Args::try_parse_from([
            "debug-server",
            "--debugAddr",
            "0.0.0.0:6060",
            "--log-level",
            "warn",
            "--max-profile-seconds",
            "10",
        ])
        .unwrap();

        let config = args.debug_config().unwrap();
        assert_eq!(config.address, "0.0.0.0:6060");
        assert_eq!(config.max_profile_duration, Duration::from_secs(10));
        assert_eq!(args.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(Args::try_parse_from(["debug-server", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_derive_and_builder_share_flag() {
        let matches = Args::command().get_matches_from(["debug-server", "--debugAddr", "[::1]:7000"]);
        assert_eq!(debug_address(&matches), "[::1]:7000");

        let args = Args::from_arg_matches(&matches).unwrap();
        assert_eq!(args.debug.debug_addr.as_deref(), Some("[::1]:7000"));
    }
}
