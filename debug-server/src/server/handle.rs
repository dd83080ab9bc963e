//! Owned handle to a running debug server

use std::io;
use std::net::SocketAddr;

use log::info;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::domain::ServeError;

/// The running accept loop.
///
/// `stop` asks it to stop accepting and drain in-flight requests; `wait`
/// joins it. Dropping the handle without calling `stop` leaves the server
/// running for the life of the runtime.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    pub(crate) fn new(
        local_addr: SocketAddr,
        shutdown_tx: oneshot::Sender<()>,
        task: JoinHandle<io::Result<()>>,
    ) -> Self {
        Self { local_addr, shutdown_tx: Some(shutdown_tx), task }
    }

    /// Address the listener is actually bound to
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal graceful shutdown. Calling it again does nothing.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The loop may already be gone if serving failed
            let _ = tx.send(());
            info!("Stopping debug server on {}", self.local_addr);
        }
    }

    /// Whether the accept loop has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the accept loop to exit.
    ///
    /// Without a prior [`stop`](Self::stop) this waits until the server fails.
    ///
    /// # Errors
    /// Returns the serve loop's I/O error, or the join error if the task
    /// panicked or was cancelled
    pub async fn wait(self) -> Result<(), ServeError> {
        let Self { local_addr, task, .. } = self;
        task.await??;
        info!("Debug server on {local_addr} stopped");
        Ok(())
    }

    /// [`stop`](Self::stop), then [`wait`](Self::wait)
    ///
    /// # Errors
    /// See [`wait`](Self::wait)
    pub async fn shutdown(mut self) -> Result<(), ServeError> {
        self.stop();
        self.wait().await
    }
}
