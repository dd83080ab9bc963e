//! # debug-server - Runtime Diagnostics Sidecar
//!
//! debug-server lets an operator look inside a running service without
//! restarting it: thread dumps, memory counters, and CPU usage profiles over
//! HTTP, plus a control endpoint to raise or lower the log level live.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Host Application                          │
//! │        add_flags / DebugArgs ──▶ DebugConfig ──▶ run()          │
//! └───────────────────────┬─────────────────────────────┬───────────┘
//!                         │ ServerHandle                │ log::info!(..)
//!                         ▼                             ▼
//! ┌──────────────────────────────────┐   ┌──────────────────────────┐
//! │      Debug Server (axum task)    │   │  ReconfigurableLogger    │
//! │                                  │   │   (env_logger backend)   │
//! │  /debug/pprof/*  ──▶ profiling   │   └────────────▲─────────────┘
//! │  /log-level      ──▶ LevelSink ──┼────────────────┘
//! └──────────────────────────────────┘   shared ReconfigurableLevel
//! ```
//!
//! ## Module Structure
//!
//! - [`server`]: binds the listener, routes requests, owns the lifecycle
//!   - `routes`: axum router and shared handler state
//!   - `pprof`: profile handlers and plain-text renderings
//!   - `log_level`: read/write the minimum severity
//!   - `handle`: [`ServerHandle`] with `stop`, `wait`, `shutdown`
//!
//! - [`profiling`]: live introspection of the current process
//!   - Threads, scheduler state and wait channels via `/proc/self/task`
//!   - Memory counters via `/proc/self/status`
//!   - CPU usage by diffing per-thread ticks over a window
//!
//! - [`logging`]: the [`LevelSink`] seam and its atomic implementation
//!
//! - [`cli`]: the `debugAddr` flag, builder and derive flavours
//!
//! - [`domain`]: core types (Tid, `ThreadState`) and errors
//!
//! ## Typical Usage
//!
//! ```no_run
//! use clap::Parser;
//! use debug_server::DebugArgs;
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     debug: DebugArgs,
//! }
//!
//! # async fn example() -> std::io::Result<()> {
//! let cli = Cli::parse();
//! let level = debug_server::logging::init(log::LevelFilter::Info).expect("logger installed once");
//!
//! if let Some(config) = cli.debug.config() {
//!     let server = debug_server::run_with_config(&config, level.clone()).await?;
//!     // ... application runs ...
//!     server.shutdown().await.ok();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ```bash
//! curl http://127.0.0.1:6060/debug/pprof/threads
//! curl 'http://127.0.0.1:6060/debug/pprof/profile?seconds=5'
//! curl -X PUT -d debug http://127.0.0.1:6060/log-level
//! ```

pub mod cli;
pub mod domain;
pub mod logging;
pub mod profiling;
pub mod server;

pub use cli::{add_flags, debug_address, DebugArgs, DEBUG_FLAG};
pub use logging::{LevelSink, ReconfigurableLevel, ReconfigurableLogger};
pub use server::{run, run_with_config, DebugConfig, ServerHandle};
