//! Path resolution under the document root.
//!
//! A request path is mapped onto the filesystem in two passes. First a
//! string guard refuses any path containing `..` or a backslash, without
//! touching the filesystem. Then the joined path is canonicalized and must
//! still lie under the canonical document root, which catches symlinks
//! leading elsewhere.

use std::path::{Path, PathBuf};

use anyhow::Context;
use percent_encoding::percent_decode_str;

/// Served in place of `/`.
pub const INDEX_FILE: &str = "/index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The path tries to leave the document root.
    Forbidden,
    /// Nothing servable at that path: missing, a directory, or not a
    /// regular file.
    NotFound,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Forbidden => f.write_str("path escapes the document root"),
            ResolveError::NotFound => f.write_str("no such file"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A regular file under the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Canonical absolute path of the file.
    pub path: PathBuf,
    /// File name as requested, used to pick the content type.
    pub file_name: String,
}

/// The canonicalized directory files are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
    root: PathBuf,
}

impl DocumentRoot {
    /// Validates and canonicalizes `path`.
    ///
    /// Fails if the path does not exist, is not a directory, or cannot be
    /// listed.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let root = tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("Document root does not exist: {}", path.display()))?;

        let meta = tokio::fs::metadata(&root)
            .await
            .with_context(|| format!("Cannot read document root: {}", root.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("Document root is not a directory: {}", root.display());
        }
        tokio::fs::read_dir(&root)
            .await
            .with_context(|| format!("Cannot read document root: {}", root.display()))?;

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Maps a raw request target (query string allowed) to a file.
    pub async fn resolve(&self, raw_path: &str) -> Result<ResolvedTarget, ResolveError> {
        let path = normalize_request_path(raw_path)?;

        let candidate = self.root.join(path.trim_start_matches('/'));

        let meta = tokio::fs::metadata(&candidate)
            .await
            .map_err(|_| ResolveError::NotFound)?;
        if !meta.is_file() {
            return Err(ResolveError::NotFound);
        }

        let canonical = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(|_| ResolveError::NotFound)?;
        if !canonical.starts_with(&self.root) {
            return Err(ResolveError::Forbidden);
        }

        let file_name = candidate
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ResolvedTarget {
            path: canonical,
            file_name,
        })
    }
}

/// Applies the string-level rules to a request target.
///
/// Strips the query string, percent-decodes (keeping the raw text if the
/// result is not UTF-8), substitutes [`INDEX_FILE`] for `/` and runs the
/// traversal guard. No filesystem access happens here.
pub fn normalize_request_path(raw_path: &str) -> Result<String, ResolveError> {
    let without_query = strip_query(raw_path);

    let decoded = percent_decode_str(without_query)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| without_query.to_string());

    let path = if decoded == "/" {
        INDEX_FILE.to_string()
    } else {
        decoded
    };

    if is_traversal(&path) {
        return Err(ResolveError::Forbidden);
    }

    Ok(path)
}

/// The request target with any query string removed.
pub fn strip_query(raw_path: &str) -> &str {
    raw_path.split_once('?').map_or(raw_path, |(path, _)| path)
}

/// The traversal guard: `..` anywhere, a backslash, or a NUL byte.
pub fn is_traversal(path: &str) -> bool {
    path.contains("..") || path.contains('\\') || path.contains('\0')
}
