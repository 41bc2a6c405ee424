//! Per-connection request processing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use log::{debug, error, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::parser::{parse_request, Error as ParserError, HttpRequest};
use crate::server::access_log::log_access;
use crate::server::content::{resolve_target, serve_content, FileInfo};
use crate::server::error::Error;
use crate::server::error_page::respond_error;
use crate::server::response::StatusCode;
use crate::stream::{BufferedReader, DEFAULT_BUFFER_SIZE};

/// Where a connection is in its single request/response cycle.
enum ConnectionState {
    Start,
    Parse,
    Resolve(HttpRequest),
    Respond(HttpRequest, FileInfo),
    Failed(Error),
    Done(Option<StatusCode>),
}

/// One accepted connection serving exactly one request.
pub struct Connection<R, W> {
    reader: BufferedReader<R>,
    writer: W,
    peer: SocketAddr,
    root: PathBuf,
    path: Option<String>,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a connection from the two halves of an accepted stream.
    pub fn new(reader: R, writer: W, peer: SocketAddr, root: &Path) -> Self {
        Self::with_buffer_size(reader, writer, peer, root, DEFAULT_BUFFER_SIZE)
    }

    /// Like [`Connection::new`] with an explicit read buffer capacity.
    pub fn with_buffer_size(
        reader: R,
        writer: W,
        peer: SocketAddr,
        root: &Path,
        buffer_size: usize,
    ) -> Self {
        Self {
            reader: BufferedReader::with_capacity(buffer_size, reader),
            writer,
            peer,
            root: root.to_path_buf(),
            path: None,
        }
    }

    /// Drive the connection to completion.
    ///
    /// Writes at most one response, emits exactly one access record and shuts
    /// down the write side. Returns the status sent, or `None` if the
    /// connection was aborted without a response.
    pub async fn run(mut self) -> Option<StatusCode> {
        let mut state = ConnectionState::Start;

        loop {
            state = match state {
                ConnectionState::Start => ConnectionState::Parse,

                ConnectionState::Parse => match parse_request(&mut self.reader).await {
                    Ok(request) => {
                        self.path = Some(request.path.clone());
                        ConnectionState::Resolve(request)
                    }
                    Err(e) => ConnectionState::Failed(e.into()),
                },

                ConnectionState::Resolve(request) => {
                    match resolve_target(&self.root, &request.path).await {
                        Ok(info) => ConnectionState::Respond(request, info),
                        Err(e) => ConnectionState::Failed(e),
                    }
                }

                ConnectionState::Respond(request, info) => {
                    match serve_content(&mut self.writer, &request, &info).await {
                        Ok(status) => ConnectionState::Done(Some(status)),
                        Err(e) => ConnectionState::Failed(e),
                    }
                }

                ConnectionState::Failed(e) => ConnectionState::Done(self.fail(e).await),

                ConnectionState::Done(status) => {
                    if let Err(e) = self.writer.shutdown().await {
                        debug!("Error closing connection to {peer}: {e}", peer = self.peer);
                    }
                    log_access(status, self.peer, self.path.as_deref());
                    return status;
                }
            };
        }
    }

    /// Answer `e` with an error page, or abort if the connection is broken.
    async fn fail(&mut self, e: Error) -> Option<StatusCode> {
        let Some(status) = e.status() else {
            match e {
                Error::ParseError(ParserError::EmptyRequest) => {
                    debug!("{peer} closed without sending a request", peer = self.peer)
                }
                e => warn!("Aborting connection from {peer}: {e}", peer = self.peer),
            }
            return None;
        };

        if status == StatusCode::InternalServerError {
            error!("Error serving {peer}: {e}", peer = self.peer);
        } else {
            debug!("Rejecting request from {peer}: {e}", peer = self.peer);
        }

        match respond_error(&mut self.writer, status, status.reason_phrase(), &e.client_message()).await {
            Ok(()) => Some(status),
            Err(err) => {
                warn!("Error sending {status} to {peer}: {err}", peer = self.peer);
                None
            }
        }
    }
}

/// Process one accepted connection end to end.
///
/// Parses a single request from `stream`, answers it from `root` and closes
/// the stream. Returns the status sent, or `None` if nothing was sent.
pub async fn process_connection<S>(stream: S, peer: SocketAddr, root: &Path) -> Option<StatusCode>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, writer) = tokio::io::split(stream);
    Connection::new(reader, writer, peer, root).run().await
}
