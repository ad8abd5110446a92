// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ragq-core: durable upload queue for the ragq client
//!
//! Files are persisted to a local SQLite queue before any network traffic,
//! then drained one at a time by the [`QueueProcessor`] with retry, backoff,
//! and cancellation. [`UploadQueue`] is the observable view the CLI drives.

pub mod bus;
pub mod clock;
pub mod error;
pub mod facade;
pub mod processor;
pub mod store;
pub mod transmit;
pub mod upload;

pub use bus::{EventBus, Subscription};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use facade::UploadQueue;
pub use processor::{
    backoff_delay, PassOutcome, PassSummary, ProcessorConfig, QueueProcessor, BASE_DELAY,
    MAX_RETRIES, MAX_RETRIES_MESSAGE,
};
pub use store::{Retention, UploadStore};
pub use transmit::{
    FilePart, TransmitError, TransmitFuture, TransmitReceipt, TransmitResult, Transmitter,
};
pub use upload::{FileType, NewUpload, QueuedUpload, UploadStatus, UploadSummary};
