use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// File bodies are copied to the client in chunks of this size.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Serializes the status line and the fixed header set, blank line included.
pub fn serialize_head(status: StatusCode, content_type: &str, content_length: u64) -> Vec<u8> {
    format!(
        "{} {} {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         Access-Control-Allow-Origin: *\r\n\
         \r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase(),
        content_type,
        content_length,
    )
    .into_bytes()
}

/// Writes `response` to `stream` and flushes it.
///
/// Returns the number of body bytes written, which always equals the
/// advertised `Content-Length`: a file that shrinks while being streamed is
/// an error, one that grows is cut at its original length.
pub async fn write_response<W>(stream: &mut W, response: Response) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let len = response.body.len();
    let head = serialize_head(response.status, &response.content_type, len);
    stream.write_all(&head).await.context("writing response head")?;

    let written = match response.body {
        Body::Bytes(bytes) => {
            stream.write_all(&bytes).await.context("writing response body")?;
            bytes.len() as u64
        }
        Body::File { file, len } => stream_file(stream, file, len).await?,
    };

    stream.flush().await?;
    Ok(written)
}

async fn stream_file<W>(stream: &mut W, file: tokio::fs::File, len: u64) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut file = file.take(len);
    let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
    let mut written = 0u64;

    loop {
        buf.clear();
        let n = file.read_buf(&mut buf).await.context("reading file")?;
        if n == 0 {
            break;
        }

        stream.write_all(&buf).await.context("writing file chunk")?;
        written += n as u64;
    }

    if written < len {
        anyhow::bail!("file truncated while streaming: {} of {} bytes sent", written, len);
    }

    Ok(written)
}
