//! Static file and directory responses.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use log::debug;
use tokio::fs::{self, File};
use tokio::io::{AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::mime;
use crate::parser::HttpRequest;
use crate::server::error::Error;
use crate::server::listing::render_listing;
use crate::server::response::{ResponseHead, StatusCode};
use crate::stream::{copy_exact, write_full, Error as StreamError};

/// Chunk size used when copying file bodies to the connection.
pub const TRANSFER_CHUNK_SIZE: usize = 64 * 1024;

/// A filesystem entry resolved from a request path.
///
/// Built fresh for every request; nothing is cached between connections.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Canonical filesystem path
    pub path: PathBuf,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

/// Resolve `request_path` against the document root.
///
/// The target is canonicalised and must stay inside the canonical root, so
/// symlinks cannot lead outside it. Only directories and regular files are
/// served.
pub async fn resolve_target(root: &Path, request_path: &str) -> Result<FileInfo, Error> {
    let root = fs::canonicalize(root).await.map_err(|e| {
        Error::InternalError(format!("document root {root}: {e}", root = root.display()))
    })?;

    let candidate = root.join(request_path.trim_start_matches('/'));
    let path = fs::canonicalize(&candidate)
        .await
        .map_err(|e| Error::from_fs(e, request_path))?;
    if !path.starts_with(&root) {
        debug!("{request_path} resolves outside the document root: {}", path.display());
        return Err(Error::Forbidden(request_path.to_string()));
    }

    let metadata = fs::metadata(&path)
        .await
        .map_err(|e| Error::from_fs(e, request_path))?;
    if !metadata.is_dir() && !metadata.is_file() {
        return Err(Error::Forbidden(request_path.to_string()));
    }

    Ok(FileInfo {
        path,
        is_dir: metadata.is_dir(),
        size: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

/// Send the response for a resolved target.
///
/// Every failure that still deserves an HTTP answer is returned before the
/// first header byte is written; errors after that point are
/// [`Error::StreamError`] only.
pub async fn serve_content<W>(
    writer: &mut W,
    request: &HttpRequest,
    info: &FileInfo,
) -> Result<StatusCode, Error>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if info.is_dir {
        serve_directory(writer, request, info).await
    } else {
        serve_file(writer, request, info).await
    }
}

/// Send a generated directory index. Ranges are not honoured here.
async fn serve_directory<W>(
    writer: &mut W,
    request: &HttpRequest,
    info: &FileInfo,
) -> Result<StatusCode, Error>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let body = render_listing(&request.path, &info.path).await?;

    let mut response = ResponseHead::new(StatusCode::Ok, "text/html", body.len() as u64)
        .with_last_modified(info.modified)
        .to_bytes();
    response.extend_from_slice(body.as_bytes());

    write_full(writer, &response).await?;
    writer.flush().await.map_err(StreamError::from)?;
    Ok(StatusCode::Ok)
}

/// Send a whole file, or the requested byte range of it.
async fn serve_file<W>(
    writer: &mut W,
    request: &HttpRequest,
    info: &FileInfo,
) -> Result<StatusCode, Error>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut file = File::open(&info.path)
        .await
        .map_err(|e| Error::from_fs(e, &request.path))?;

    let content_type = mime::resolve(&request.path);
    let head = ResponseHead::new(StatusCode::Ok, content_type, info.size)
        .with_accept_ranges()
        .with_last_modified(info.modified);

    let (head, start) = match request.range {
        None => (head, 0),
        Some(range) => {
            let resolved = range
                .resolve(info.size)
                .ok_or(Error::RangeNotSatisfiable { size: info.size })?;
            let head = ResponseHead {
                status: StatusCode::PartialContent,
                content_length: resolved.len(),
                ..head
            }
            .with_content_range(resolved.content_range(info.size));
            (head, resolved.start)
        }
    };

    if start > 0 {
        file.seek(SeekFrom::Start(start))
            .await
            .map_err(|e| Error::from_fs(e, &request.path))?;
    }

    // headers must reach the peer before the body transfer starts
    write_full(writer, &head.to_bytes()).await?;
    writer.flush().await.map_err(StreamError::from)?;

    copy_exact(&mut file, writer, head.content_length, TRANSFER_CHUNK_SIZE).await?;
    Ok(head.status)
}
