// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ragq-core operations.

use thiserror::Error;

/// All possible errors that can occur in ragq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("upload not found: {0}")]
    UploadNotFound(String),

    #[error("upload {0} is being transmitted\n  hint: wait for the current pass to finish before removing it")]
    UploadInProgress(String),

    #[error("invalid file type: '{0}'\n  hint: valid types are: document, image")]
    InvalidFileType(String),

    #[error("invalid upload status: '{0}'\n  hint: valid statuses are: queued, uploading, completed, failed")]
    InvalidStatus(String),

    #[error("upload queue unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ragq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
