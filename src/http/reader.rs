//! Request reader.
//!
//! Reads the request line of a single request and drains the header block
//! that follows it. Headers are never interpreted: the server only needs the
//! method and the path.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::parser::{parse_request_line, ParseError};
use crate::http::request::Request;

/// Longest line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8192;

/// What the client sent on a fresh connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// The connection closed before any bytes arrived, or the request line
    /// was empty. No response is owed.
    Nothing,
    /// A request line with at least a method and a path.
    Request(Request),
    /// Something arrived, but it is not a usable request line.
    Malformed(ParseError),
}

/// Reads one request from `reader`.
///
/// After the request line, header lines are read and discarded up to the
/// blank line ending the header block or the end of the stream, so that the
/// response is not sent while unread request bytes are still pending.
pub async fn read_request<R>(reader: &mut R) -> std::io::Result<Incoming>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(256);

    let line = match read_line(reader, &mut buf).await? {
        None => return Ok(Incoming::Nothing),
        Some(line) => line,
    };

    if line.text.is_empty() && !line.overlong {
        return Ok(Incoming::Nothing);
    }

    let parsed = if line.overlong {
        Err(ParseError::InvalidRequest)
    } else {
        parse_request_line(&line.text)
    };

    discard_headers(reader, &mut buf).await?;

    Ok(match parsed {
        Ok(request) => Incoming::Request(request),
        Err(e) => Incoming::Malformed(e),
    })
}

/// Reads lines until an empty one or EOF.
async fn discard_headers<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = read_line(reader, buf).await? {
        if line.text.is_empty() && !line.overlong {
            break;
        }
    }
    Ok(())
}

/// One line with its terminator removed.
struct Line {
    text: String,
    /// The line ran past [`MAX_LINE_LEN`]; `text` holds only its start.
    overlong: bool,
}

/// Reads a single line, without its `\n` or `\r\n` terminator.
///
/// Returns `None` at end of stream. A line longer than [`MAX_LINE_LEN`] is
/// truncated and the remainder, terminator included, is consumed.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<Line>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = read_limited(reader, buf).await?;

    if n == 0 {
        return Ok(None);
    }

    let mut overlong = false;
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if n >= MAX_LINE_LEN {
        overlong = true;
        skip_line(reader).await?;
    }

    Ok(Some(Line {
        text: String::from_utf8_lossy(buf).into_owned(),
        overlong,
    }))
}

/// Consumes input up to and including the next `\n`, or to EOF.
async fn skip_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut scratch = Vec::new();
    loop {
        scratch.clear();
        let n = read_limited(reader, &mut scratch).await?;
        if n == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

async fn read_limited<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    (&mut *reader)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', buf)
        .await
}
