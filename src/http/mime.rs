//! Content classifier: file extension to MIME type.

/// Returned for files whose extension is absent or not in [`MIME_TYPES`].
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Known extensions, lowercase.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
];

/// Returns the extension of `file_name`: the text after the last `.`.
///
/// A name with no dot, or whose only dot is the first character (`.bashrc`),
/// has no extension.
pub fn extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => Some(&file_name[idx + 1..]),
        _ => None,
    }
}

/// Maps a file name to its MIME type.
///
/// # Example
///
/// ```
/// # use docserve::http::mime::content_type;
/// assert_eq!(content_type("index.HTML"), "text/html");
/// assert_eq!(content_type("archive.tar"), "application/octet-stream");
/// ```
pub fn content_type(file_name: &str) -> &'static str {
    let Some(ext) = extension(file_name) else {
        return DEFAULT_MIME_TYPE;
    };

    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}
