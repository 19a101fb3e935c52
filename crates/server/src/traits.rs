//! Server lifecycle traits

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A long-running network server.
///
/// Implemented by [`HttpServer`](crate::http::HttpServer).
#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Name for logging and identification
    fn name(&self) -> &str;

    /// Bound address, `None` unless running
    fn address(&self) -> Option<SocketAddr>;

    fn is_running(&self) -> bool;

    /// Serve until `shutdown` is cancelled, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind or hits a fatal I/O error.
    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience methods, implemented for every [`Server`].
pub trait ServerExt: Server + Sized {
    /// Run on a new task; cancel the returned token to stop it.
    ///
    /// ```ignore
    /// let (handle, token) = server.spawn();
    /// token.cancel();
    /// handle.await??;
    /// ```
    fn spawn(self) -> (tokio::task::JoinHandle<Result<()>>, CancellationToken) {
        let token = CancellationToken::new();
        let token_clone = token.clone();
        let handle = tokio::spawn(async move { self.run(token_clone).await });
        (handle, token)
    }

    /// Run until Ctrl+C (or SIGTERM on unix)
    fn run_with_ctrl_c(self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let shutdown = crate::shutdown::ShutdownController::with_ctrl_c();
            self.run(shutdown.token()).await
        }
    }
}

impl<T: Server + Sized> ServerExt for T {}
