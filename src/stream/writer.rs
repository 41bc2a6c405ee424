//! Write helpers that account for every byte.

use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::stream::error::Error;

/// Write the whole of `bytes` to `writer`.
///
/// Interrupted writes are retried. A writer that accepts zero bytes before the
/// buffer is drained fails with [`Error::ShortWrite`].
pub async fn write_full<W>(writer: &mut W, bytes: &[u8]) -> Result<(), Error>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;

    while written < bytes.len() {
        match writer.write(&bytes[written..]).await {
            Ok(0) => {
                return Err(Error::ShortWrite {
                    expected: bytes.len(),
                    written,
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }

    Ok(())
}

/// Copy exactly `len` bytes from `reader` to `writer`, then flush.
///
/// `chunk_size` bounds the intermediate buffer. If `reader` runs dry before
/// `len` bytes were copied the transfer fails with [`Error::ShortRead`].
pub async fn copy_exact<R, W>(
    reader: &mut R,
    writer: &mut W,
    len: u64,
    chunk_size: usize,
) -> Result<u64, Error>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut copied: u64 = 0;

    while copied < len {
        let want = (len - copied).min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]).await {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected: len,
                    received: copied,
                })
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        };

        write_full(writer, &buf[..n]).await?;
        copied += n as u64;
    }

    writer.flush().await?;
    Ok(copied)
}
