use tokio::fs::File;

/// An HTTP status code.
///
/// The server only ever emits the codes with associated constants below.
/// [`StatusCode::reason_phrase`] knows exactly those and answers `"Unknown"`
/// for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 403 Forbidden
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::FORBIDDEN.reason_phrase(), "Forbidden");
    /// assert_eq!(StatusCode::from_u16(418).reason_phrase(), "Unknown");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// Where the response body comes from.
#[derive(Debug)]
pub enum Body {
    /// A body held in memory.
    Bytes(Vec<u8>),
    /// An open file streamed to the client; `len` is its size in bytes.
    File { file: File, len: u64 },
}

impl Body {
    /// The value of the `Content-Length` header.
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A response ready to be handed to the writer.
///
/// Built once per connection and consumed by
/// [`write_response`](crate::http::writer::write_response).
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Body,
}

impl Response {
    /// A `text/plain` response whose body is the status's reason phrase.
    pub fn plain(status: StatusCode) -> Self {
        Self::text(status, status.reason_phrase())
    }

    /// A `text/plain` response with the given body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: Body::Bytes(body.into().into_bytes()),
        }
    }

    /// A 200 response streaming `file`.
    pub fn file(file: File, len: u64, content_type: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: content_type.into(),
            body: Body::File { file, len },
        }
    }

    pub fn bad_request() -> Self {
        Self::plain(StatusCode::BAD_REQUEST)
    }

    pub fn forbidden() -> Self {
        Self::plain(StatusCode::FORBIDDEN)
    }

    pub fn not_found() -> Self {
        Self::plain(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::plain(StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn internal_error() -> Self {
        Self::plain(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
