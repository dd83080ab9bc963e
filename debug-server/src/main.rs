//! # debug-server - Main Entry Point
//!
//! Standalone sidecar: serves the debug endpoints for its own process and
//! emits a heartbeat at every log level, so the effect of `/log-level` is
//! visible on stderr.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, trace, warn};

use debug_server::cli::Args;
use debug_server::logging;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_ADDR_IN_USE: i32 = 98;

fn main() {
    let args = Args::parse();
    std::process::exit(match run(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let addr_in_use = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::AddrInUse);
    if addr_in_use {
        EXIT_ADDR_IN_USE
    } else {
        EXIT_ERROR
    }
}

/// Log one line at every level, forever
async fn heartbeat(every: Duration) {
    if every.is_zero() {
        return std::future::pending().await;
    }

    let mut ticker = tokio::time::interval(every);
    let mut beat: u64 = 0;
    loop {
        ticker.tick().await;
        beat += 1;
        error!("heartbeat {beat}");
        warn!("heartbeat {beat}");
        info!("heartbeat {beat}");
        debug!("heartbeat {beat}");
        trace!("heartbeat {beat}");
    }
}

#[tokio::main]
async fn run(args: Args) -> Result<()> {
    let level = logging::init(args.log_level).context("Failed to install logger")?;

    let Some(config) = args.debug_config() else {
        info!("Debug server disabled (no --debugAddr given)");
        return Ok(());
    };

    let server = debug_server::run_with_config(&config, level)
        .await
        .with_context(|| format!("Failed to bind debug server to {}", config.address))?;

    println!("debug-server v{}", env!("CARGO_PKG_VERSION"));
    println!("profiles: http://{}/debug/pprof/", server.local_addr());
    println!("log level: http://{}/log-level", server.local_addr());

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl+C")?;
        }
        () = heartbeat(Duration::from_secs(args.heartbeat)) => {}
    }

    server.shutdown().await.context("Debug server failed")?;
    Ok(())
}
