//! Minimal HTML error responses.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::server::html::escape_html;
use crate::server::response::{ResponseHead, StatusCode, SERVER_NAME};
use crate::stream::{write_full, Error as StreamError};

/// Build the HTML body of an error page.
pub fn error_page(status: StatusCode, short_message: &str, long_message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>{code} {short}</title></head>\n\
         <body>\n\
         <h1>{code}: {short}</h1>\n\
         <p>{long}</p>\n\
         <hr><em>{SERVER_NAME}</em>\n\
         </body>\n\
         </html>\n",
        code = status.as_u16(),
        short = escape_html(short_message),
        long = escape_html(long_message),
    )
}

/// Send a complete error response and flush it.
///
/// The head and body go out in a single write so nothing is left half-sent if
/// the peer disappears.
pub async fn respond_error<W>(
    writer: &mut W,
    status: StatusCode,
    short_message: &str,
    long_message: &str,
) -> Result<(), StreamError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let body = error_page(status, short_message, long_message);
    let mut response = ResponseHead::new(status, "text/html", body.len() as u64).to_bytes();
    response.extend_from_slice(body.as_bytes());

    write_full(writer, &response).await?;
    writer.flush().await?;
    Ok(())
}
