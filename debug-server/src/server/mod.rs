//! Debug HTTP server
//!
//! Serves the profiling namespace and the log-level control endpoint:
//! - `GET /debug/pprof/` - index of available profiles
//! - `GET /debug/pprof/{profile}` - threads, heap, CPU, block, mutex, cmdline
//! - `GET /log-level` - current minimum severity
//! - `PUT|POST /log-level` - set minimum severity from the request body

pub mod config;
pub mod handle;
pub mod log_level;
pub mod pprof;
pub mod routes;

pub use config::DebugConfig;
pub use handle::ServerHandle;
pub use routes::{router, AppState};

use std::io;
use std::sync::Arc;

use log::info;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::logging::LevelSink;

/// Bind `address` and serve the debug routes in a background task.
///
/// Returns once the listener is bound: connections made after this point
/// are queued by the kernel and served. A single bind attempt is made.
///
/// # Errors
/// The bind error exactly as the OS reported it, e.g.
/// [`io::ErrorKind::AddrInUse`]
pub async fn run<S: LevelSink>(address: &str, sink: S) -> io::Result<ServerHandle> {
    run_with_config(&DebugConfig::new(address), sink).await
}

/// [`run`] with an explicit [`DebugConfig`]
///
/// # Errors
/// The bind error exactly as the OS reported it
pub async fn run_with_config<S: LevelSink>(
    config: &DebugConfig,
    sink: S,
) -> io::Result<ServerHandle> {
    let listener = TcpListener::bind(config.address.as_str()).await?;
    let local_addr = listener.local_addr()?;

    let state = AppState::new(Arc::new(sink), config.max_profile_duration);
    let app = router(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // A dropped handle detaches the server instead of stopping it
                if shutdown_rx.await.is_err() {
                    std::future::pending::<()>().await;
                }
            })
            .await
    });

    info!("Debug server listening on {local_addr}");
    Ok(ServerHandle::new(local_addr, shutdown_tx, task))
}
