use crate::http::request::{Method, Request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than two whitespace-delimited tokens
    InvalidRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequest => f.write_str("malformed request line"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses a request line of the form `<METHOD> <path> [HTTP/x.x]`.
///
/// The line must already be stripped of its line terminator. Any token after
/// the version is ignored. A line of only whitespace has no tokens and is
/// invalid like any other short line.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().map(str::to_string);

    Ok(Request {
        method: Method::from_token(method_str),
        path: path.to_string(),
        version,
    })
}
