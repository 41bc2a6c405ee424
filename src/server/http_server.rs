//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::server::access_log::log_access;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::error::Error;
use crate::server::error_page::respond_error;
use crate::server::response::StatusCode;

/// How long a rejected client may keep sending before its socket is dropped.
const REJECT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Permits for connections being served and for connections being turned away.
///
/// Both pools hold `max_connections` permits; once the rejection pool is empty
/// further connections are closed without a response.
struct ConnectionLimits {
    active: Arc<Semaphore>,
    rejecting: Arc<Semaphore>,
}

impl ConnectionLimits {
    fn new(max_connections: usize) -> Self {
        Self {
            active: Arc::new(Semaphore::new(max_connections)),
            rejecting: Arc::new(Semaphore::new(max_connections)),
        }
    }
}

/// An HTTP server for one document root.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Check the document root and return its canonical form.
    async fn prepare_root(&self) -> Result<PathBuf, Error> {
        let root = tokio::fs::canonicalize(&self.config.root).await.map_err(|e| {
            Error::ConfigError(format!("document root {}: {e}", self.config.root.display()))
        })?;
        if !tokio::fs::metadata(&root).await?.is_dir() {
            return Err(Error::ConfigError(format!("document root {} is not a directory", root.display())));
        }
        Ok(root)
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(listener)
    }

    /// Wait for Ctrl+C.
    async fn ctrl_c() {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                error!("Error setting up Ctrl+C handler: {e}");
                std::future::pending::<()>().await
            }
        }
    }

    /// Handle a new connection.
    fn handle_new_connection(
        socket: TcpStream,
        addr: SocketAddr,
        limits: &ConnectionLimits,
        root: Arc<PathBuf>,
        read_buffer_size: usize,
        tasks: &mut JoinSet<()>,
    ) {
        // Try to acquire a permit from the semaphore
        let permit = match limits.active.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                let Ok(permit) = limits.rejecting.clone().try_acquire_owned() else {
                    warn!("Connection limit reached, dropping connection from {addr}");
                    log_access(None, addr, None);
                    return;
                };
                warn!("Connection limit reached, rejecting connection from {addr}");
                tasks.spawn(async move {
                    let _permit = permit;
                    let status = Self::reject_connection(socket, addr).await;
                    log_access(status, addr, None);
                });
                return;
            }
        };

        // Spawn a task to handle the connection
        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            let (reader, writer) = socket.into_split();
            Connection::with_buffer_size(reader, writer, addr, &root, read_buffer_size)
                .run()
                .await;
        });
    }

    /// Answer an over-limit connection with 503 and close it.
    ///
    /// The write side is shut down first and whatever the client already sent
    /// is drained for a short while, so the close does not reset the
    /// connection before the page arrives.
    async fn reject_connection(socket: TcpStream, addr: SocketAddr) -> Option<StatusCode> {
        let (mut reader, mut writer) = socket.into_split();
        let status = match respond_error(
            &mut writer,
            StatusCode::ServiceUnavailable,
            StatusCode::ServiceUnavailable.reason_phrase(),
            "Server is at capacity, please try again later",
        )
        .await
        {
            Ok(()) => Some(StatusCode::ServiceUnavailable),
            Err(e) => {
                debug!("Error rejecting {addr}: {e}");
                return None;
            }
        };

        if let Err(e) = writer.shutdown().await {
            debug!("Error closing connection to {addr}: {e}");
            return status;
        }

        let drain = async {
            let mut buf = [0u8; 1024];
            while let Ok(n) = reader.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
        };
        if tokio::time::timeout(REJECT_DRAIN_TIMEOUT, drain).await.is_err() {
            debug!("{addr} kept its connection open after the 503");
        }
        status
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        // If there's a critical error, signal to break the loop
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Shutdown timed out, dropping {len} connections", len = tasks.len());
            tasks.abort_all();
        }

        info!("Server shutdown complete");
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = self.setup_listener().await?;
        self.serve(listener).await
    }

    /// Serve connections from `listener` until Ctrl+C.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        self.serve_with_shutdown(listener, Self::ctrl_c()).await
    }

    /// Serve connections from `listener` until `shutdown` completes.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let root = Arc::new(self.prepare_root().await?);
        info!("Serving files from {root}", root = root.display());

        // Semaphores limiting served and rejected connections
        let limits = ConnectionLimits::new(self.config.max_connections);

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check for shutdown signal
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                // Reap finished connection tasks
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                &limits,
                                root.clone(),
                                self.config.read_buffer_size,
                                &mut tasks,
                            );
                        }
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        // Perform graceful shutdown
        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }
}
