//! Builder-side `debugAddr` flag

use clap::{Arg, ArgMatches, Command};

/// Name (and long form) of the debug address flag
pub const DEBUG_FLAG: &str = "debugAddr";

/// Register `--debugAddr <HOST:PORT>` on `cmd`.
///
/// Only the double-dash form is accepted; `-debugAddr` with a single dash is
/// rejected by clap as a cluster of short flags.
///
/// Registering twice on the same command is a caller bug; clap's own
/// assertion reports it when the command is built.
#[must_use]
pub fn add_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(DEBUG_FLAG)
            .long(DEBUG_FLAG)
            .value_name("HOST:PORT")
            .help("Address to serve /debug/pprof and /log-level on (empty: disabled)"),
    )
}

/// The parsed `debugAddr` value, or `""` when the flag was not given or was
/// never registered on the command that produced `matches`.
#[must_use]
pub fn debug_address(matches: &ArgMatches) -> String {
    matches.try_get_one::<String>(DEBUG_FLAG).ok().flatten().cloned().unwrap_or_default()
}
