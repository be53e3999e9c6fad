//! Error types exposed by this crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::pages;

/// Configuration validation errors surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No usernames were configured.
    #[error("at least one username must be configured")]
    NoUsers,
    /// A configured username was empty.
    #[error("usernames cannot be empty")]
    EmptyUser,
    /// The shared password was empty.
    #[error("password cannot be empty")]
    EmptyPassword,
    /// The session signing secret was empty.
    #[error("session secret cannot be empty")]
    EmptySecret,
}

/// Upload pipeline failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file was rejected before any I/O: extension or declared content
    /// type is not in the image allowlist.
    #[error("unsupported file type `{content_type}` for `{file_name}`")]
    UnsupportedType {
        /// Client-supplied filename of the rejected file.
        file_name: String,
        /// Declared content type of the rejected file.
        content_type: String,
    },
    /// Writing the photo (or its metadata sidecar) to disk failed.
    #[error("failed to write `{name}`: {source}")]
    Write {
        /// Final on-disk filename the write was attempted under.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The store was shut down before the write could run.
    #[error("photo store is shut down")]
    Closed,
}

/// Handler-boundary error: anything unexpected inside a request handler.
///
/// Converted into a generic failure page so a single bad request can log its
/// full detail without crashing the process or leaking internals.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading the multipart upload body failed.
    #[error("multipart request failed: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    /// Filesystem failure while serving a photo.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// Building an HTTP response failed.
    #[error("failed to build response: {0}")]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request handler failed");
        (StatusCode::INTERNAL_SERVER_ERROR, pages::failure()).into_response()
    }
}
