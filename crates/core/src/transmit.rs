// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transmission abstraction for queued uploads.
//!
//! The processor hands each entry to a [`Transmitter`]. The production
//! implementation speaks HTTP to the document repository; tests script
//! outcomes with in-memory implementations.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::upload::{FileType, NewUpload, QueuedUpload};

/// Backend acknowledgement of a transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitReceipt {
    pub success: bool,
    pub message: String,
}

impl TransmitReceipt {
    /// A successful receipt with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        TransmitReceipt { success: true, message: message.into() }
    }

    /// A receipt where the backend declined the file.
    pub fn rejected(message: impl Into<String>) -> Self {
        TransmitReceipt { success: false, message: message.into() }
    }
}

/// Why a transmission did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransmitError {
    /// The attempt was aborted through its cancellation token.
    #[error("upload cancelled")]
    Cancelled,

    /// The backend rejected the credentials.
    #[error("not authorized\n  hint: run 'ragq login' to refresh your session")]
    Unauthorized,

    /// Any other failure: network, server error, rejected payload.
    #[error("{0}")]
    Failed(String),
}

/// Result type for transmissions.
pub type TransmitResult<T> = std::result::Result<T, TransmitError>;

/// Boxed future returned by [`Transmitter`] methods.
pub type TransmitFuture<'a> =
    Pin<Box<dyn Future<Output = TransmitResult<TransmitReceipt>> + Send + 'a>>;

/// One file as it goes over the wire.
#[derive(Debug, Clone, Copy)]
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub payload: &'a [u8],
}

impl<'a> From<&'a QueuedUpload> for FilePart<'a> {
    fn from(upload: &'a QueuedUpload) -> Self {
        FilePart {
            file_name: &upload.file_name,
            content_type: &upload.content_type,
            payload: &upload.payload,
        }
    }
}

impl<'a> From<&'a NewUpload> for FilePart<'a> {
    fn from(upload: &'a NewUpload) -> Self {
        FilePart {
            file_name: &upload.file_name,
            content_type: &upload.content_type,
            payload: &upload.payload,
        }
    }
}

/// Sends files to the repository backend.
///
/// Implementations must observe `cancel` and resolve to
/// [`TransmitError::Cancelled`] once it fires.
pub trait Transmitter: Send + Sync {
    /// Upload a document for text indexing.
    fn transmit_document<'a>(
        &'a self,
        file: FilePart<'a>,
        cancel: CancellationToken,
    ) -> TransmitFuture<'a>;

    /// Upload an image for visual indexing.
    fn transmit_image<'a>(
        &'a self,
        file: FilePart<'a>,
        cancel: CancellationToken,
    ) -> TransmitFuture<'a>;
}

/// Send `upload` through the endpoint matching its file type.
///
/// A receipt with `success == false` is reported as [`TransmitError::Failed`].
pub async fn transmit(
    transmitter: &dyn Transmitter,
    upload: &QueuedUpload,
    cancel: CancellationToken,
) -> TransmitResult<TransmitReceipt> {
    let file = FilePart::from(upload);
    let receipt = match upload.file_type {
        FileType::Document => transmitter.transmit_document(file, cancel).await?,
        FileType::Image => transmitter.transmit_image(file, cancel).await?,
    };
    if receipt.success {
        Ok(receipt)
    } else {
        Err(TransmitError::Failed(receipt.message))
    }
}

#[cfg(test)]
#[path = "transmit_tests.rs"]
mod tests;
