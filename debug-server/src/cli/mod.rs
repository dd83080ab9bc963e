//! Command-line handling
//!
//! - `flags`: register/read the `debugAddr` flag on a caller's clap `Command`
//! - `args`: derive-based [`DebugArgs`] to flatten into a `Parser`, and the
//!   binary's own [`Args`]

pub mod args;
pub mod flags;

pub use args::{Args, DebugArgs};
pub use flags::{add_flags, debug_address, DEBUG_FLAG};
