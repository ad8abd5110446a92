// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transmitter used by the upload queue.
//!
//! Wraps [`ApiClient::upload`] and races it against the cancellation token,
//! so a cancelled transmission drops the in-flight request.

use ragq_core::{
    FilePart, FileType, TransmitError, TransmitFuture, TransmitReceipt, TransmitResult,
    Transmitter,
};
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::error::Error;

/// Sends queued uploads to the repository over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTransmitter {
    client: ApiClient,
}

impl HttpTransmitter {
    /// Creates a transmitter from an authenticated client.
    pub fn new(client: ApiClient) -> Self {
        HttpTransmitter { client }
    }

    async fn send(
        &self,
        file_type: FileType,
        file: FilePart<'_>,
        cancel: CancellationToken,
    ) -> TransmitResult<TransmitReceipt> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransmitError::Cancelled),
            result = self.client.upload(file_type, file) => match result {
                Ok(response) => Ok(TransmitReceipt {
                    success: response.success,
                    message: response.message,
                }),
                Err(e) => Err(to_transmit_error(e)),
            },
        }
    }
}

impl Transmitter for HttpTransmitter {
    fn transmit_document<'a>(
        &'a self,
        file: FilePart<'a>,
        cancel: CancellationToken,
    ) -> TransmitFuture<'a> {
        Box::pin(self.send(FileType::Document, file, cancel))
    }

    fn transmit_image<'a>(
        &'a self,
        file: FilePart<'a>,
        cancel: CancellationToken,
    ) -> TransmitFuture<'a> {
        Box::pin(self.send(FileType::Image, file, cancel))
    }
}

/// Maps a client error onto the processor's failure classes.
///
/// Failure messages keep only the first line; hints are for the terminal,
/// not for the stored entry.
pub fn to_transmit_error(err: Error) -> TransmitError {
    match err {
        Error::Unauthorized => TransmitError::Unauthorized,
        Error::Cancelled => TransmitError::Cancelled,
        other => {
            let message = other.to_string();
            let first = message.lines().next().unwrap_or_default();
            TransmitError::Failed(first.to_string())
        }
    }
}

#[cfg(test)]
#[path = "transmit_tests.rs"]
mod tests;
