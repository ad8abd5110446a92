// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the ragq CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in\n  hint: run 'ragq login' or set RAGQ_TOKEN")]
    NotLoggedIn,

    #[error("not authorized: the server rejected your session\n  hint: run 'ragq login' to sign in again")]
    Unauthorized,

    #[error("permission denied: {0}\n  hint: this command requires an admin account")]
    Forbidden(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not reach the server: {0}\n  hint: check api_url with 'ragq config show'")]
    Http(#[from] reqwest::Error),

    #[error("server is not healthy (status: {0})")]
    Unhealthy(String),

    #[error("upload not found: {0}")]
    UploadNotFound(String),

    #[error("ambiguous upload id '{0}' matches {1} entries\n  hint: use more characters of the id")]
    AmbiguousId(String, usize),

    #[error("upload {0} is being transmitted\n  hint: wait for it to finish before removing it")]
    UploadInProgress(String),

    #[error("upload queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("queue is busy: another ragq process is uploading\n  hint: try again when it finishes")]
    QueueBusy,

    #[error("invalid file type: '{0}'\n  hint: valid types are: document, image")]
    InvalidFileType(String),

    #[error("cannot infer file type for '{0}'\n  hint: pass --type document or --type image")]
    UnknownFileType(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unknown config key '{0}'\n  hint: valid keys are: {keys}", keys = crate::config::SETTABLE_KEYS.join(", "))]
    UnknownConfigKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("interactive prompt requires a terminal (TTY)\n  hint: use --password-stdin")]
    TtyRequired,

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("queue error: {0}")]
    Queue(String),
}

/// A specialized Result type for ragq operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ragq_core::Error> for Error {
    fn from(e: ragq_core::Error) -> Self {
        match e {
            ragq_core::Error::UploadNotFound(id) => Error::UploadNotFound(id),
            ragq_core::Error::UploadInProgress(id) => Error::UploadInProgress(id),
            ragq_core::Error::InvalidFileType(s) => Error::InvalidFileType(s),
            ragq_core::Error::Unavailable(s) => Error::QueueUnavailable(s),
            ragq_core::Error::Io(e) => Error::Io(e),
            other => Error::Queue(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
