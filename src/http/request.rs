/// HTTP request methods.
///
/// Only GET is served. Every other method, known or not, is answered with
/// 405 Method Not Allowed, so the unknown ones are kept verbatim rather than
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token found in the method position
    Extension(String),
}

impl Method {
    /// Parses one of the standard HTTP methods.
    ///
    /// Matching is case-sensitive, as method names are in HTTP.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    /// Like [`Method::from_str`], but keeps unknown tokens as
    /// [`Method::Extension`].
    pub fn from_token(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| Method::Extension(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(s) => s,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a client request the server acts on.
///
/// Parsed once from the request line; headers are never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, query string included (e.g. "/a.html?x=1")
    pub path: String,
    /// HTTP version token, if the client sent one
    pub version: Option<String>,
}
