// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue processor: drains pending uploads one at a time.
//!
//! A pass repeatedly picks the oldest pending entry, marks it `uploading`,
//! hands it to the [`Transmitter`], and records the outcome. Transient
//! failures mark the entry `failed` and back off exponentially before the
//! next entry. An authorization failure or a cancellation ends the pass
//! early and leaves the entry `queued`.
//!
//! Only one pass runs at a time per processor. A second call to
//! [`QueueProcessor::process_queue`] while a pass is active returns
//! [`PassOutcome::AlreadyRunning`] without touching the queue. The running
//! pass then reads the queue once more before it returns, so work queued by
//! the turned-away caller is not stranded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::bus::EventBus;
use crate::error::Result;
use crate::store::UploadStore;
use crate::transmit::{transmit, TransmitError, Transmitter};
use crate::upload::{QueuedUpload, UploadStatus};

/// Attempts allowed per entry before it is failed for good.
pub const MAX_RETRIES: u32 = 3;

/// Backoff unit after a transient failure.
pub const BASE_DELAY: Duration = Duration::from_millis(1000);

/// Error recorded on an entry that used up its attempts.
pub const MAX_RETRIES_MESSAGE: &str = "Max retries exceeded";

/// Retry policy for a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
        }
    }
}

/// Delay after a failed attempt: `base * 2^retry_count`, saturating.
pub fn backoff_delay(base: Duration, retry_count: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry_count))
}

/// Counts from one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Entries accepted by the backend.
    pub completed: usize,
    /// Entries marked `failed`, including retry exhaustion.
    pub failed: usize,
    /// Entries put back to `queued` by a cancellation or auth failure.
    pub requeued: usize,
    /// The pass stopped because the backend rejected the credentials.
    pub halted_unauthorized: bool,
    /// The pass stopped because the current transmission was cancelled.
    pub cancelled: bool,
}

impl PassSummary {
    /// True if the pass ended before the queue was drained.
    pub fn halted(&self) -> bool {
        self.halted_unauthorized || self.cancelled
    }
}

/// Result of a call to [`QueueProcessor::process_queue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Another pass was active; nothing was done.
    AlreadyRunning,
    /// This call ran a pass to its end.
    Finished(PassSummary),
}

impl PassOutcome {
    /// The pass summary, if this call ran one.
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            PassOutcome::AlreadyRunning => None,
            PassOutcome::Finished(summary) => Some(summary),
        }
    }
}

/// What the pass loop should do after handling one entry.
enum Step {
    Continue,
    Backoff(Duration),
    Halt,
}

/// Drives queued uploads through the transmitter.
pub struct QueueProcessor {
    store: Arc<UploadStore>,
    transmitter: Arc<dyn Transmitter>,
    bus: EventBus,
    config: ProcessorConfig,
    processing: AtomicBool,
    rerun: AtomicBool,
    current: Mutex<Option<CancellationToken>>,
}

impl QueueProcessor {
    /// Creates a processor with the default retry policy.
    pub fn new(store: Arc<UploadStore>, transmitter: Arc<dyn Transmitter>, bus: EventBus) -> Self {
        Self::with_config(store, transmitter, bus, ProcessorConfig::default())
    }

    /// Creates a processor with a custom retry policy.
    pub fn with_config(
        store: Arc<UploadStore>,
        transmitter: Arc<dyn Transmitter>,
        bus: EventBus,
        config: ProcessorConfig,
    ) -> Self {
        QueueProcessor {
            store,
            transmitter,
            bus,
            config,
            processing: AtomicBool::new(false),
            rerun: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    /// The store this processor drains.
    pub fn store(&self) -> &Arc<UploadStore> {
        &self.store
    }

    /// The bus notified on every state change.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The retry policy in effect.
    pub fn config(&self) -> ProcessorConfig {
        self.config
    }

    /// True while a pass is running.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// True while a pass is running. Used to warn before leaving.
    pub fn has_work_in_flight(&self) -> bool {
        self.is_processing()
    }

    /// Cancels the in-flight transmission, if any. Returns true if one was cancelled.
    pub fn cancel_current(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match current.as_ref() {
            Some(token) => {
                tracing::info!("cancelling current upload");
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn set_current(&self, token: Option<CancellationToken>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = token;
    }

    /// Run one processing pass.
    ///
    /// Returns immediately with [`PassOutcome::AlreadyRunning`] if a pass is
    /// active. Store errors end the pass; the entries stay where they are and
    /// the next pass picks them up.
    pub async fn process_queue(&self) -> PassOutcome {
        if !self.begin_pass() {
            tracing::debug!("processing pass already running");
            return PassOutcome::AlreadyRunning;
        }

        let mut summary = PassSummary::default();
        loop {
            let result = {
                let _guard = PassGuard { processor: self };
                self.bus.notify();
                self.run_pass(&mut summary).await
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "processing pass stopped on store error");
                break;
            }
            // A call turned away while this pass was finishing may have queued
            // work after the last read. Go again unless another pass took over.
            if summary.halted() || !self.rerun.swap(false, Ordering::SeqCst) || !self.acquire() {
                break;
            }
            tracing::debug!("queue changed while finishing, running again");
        }

        tracing::info!(
            completed = summary.completed,
            failed = summary.failed,
            requeued = summary.requeued,
            halted = summary.halted(),
            "processing pass finished"
        );
        PassOutcome::Finished(summary)
    }

    fn acquire(&self) -> bool {
        let acquired = self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if acquired {
            self.rerun.store(false, Ordering::SeqCst);
        }
        acquired
    }

    /// Claim the processing flag. A caller that loses the race leaves a rerun
    /// request for the running pass, then tries once more in case that pass
    /// released the flag in between.
    fn begin_pass(&self) -> bool {
        if self.acquire() {
            return true;
        }
        self.rerun.store(true, Ordering::SeqCst);
        self.acquire()
    }

    async fn run_pass(&self, summary: &mut PassSummary) -> Result<()> {
        let removed = self.store.cleanup_old()?;
        if removed > 0 {
            tracing::debug!(removed, "evicted old queue entries");
        }

        loop {
            let pending = self.store.get_pending()?;
            let Some(upload) = oldest(pending) else {
                break;
            };

            match self.process_one(&upload, summary).await? {
                Step::Continue => {}
                Step::Backoff(delay) => tokio::time::sleep(delay).await,
                Step::Halt => break,
            }
        }
        Ok(())
    }

    async fn process_one(&self, upload: &QueuedUpload, summary: &mut PassSummary) -> Result<Step> {
        if upload.retry_count >= self.config.max_retries {
            tracing::warn!(id = %upload.id, file = %upload.file_name, "retry budget exhausted");
            self.store
                .update_status(&upload.id, UploadStatus::Failed, Some(MAX_RETRIES_MESSAGE))?;
            summary.failed += 1;
            self.bus.notify();
            return Ok(Step::Continue);
        }

        let attempts_before = upload.retry_count;
        self.store.update_status(&upload.id, UploadStatus::Uploading, None)?;
        self.bus.notify();
        tracing::debug!(id = %upload.id, file = %upload.file_name, attempt = attempts_before + 1, "uploading");

        let token = CancellationToken::new();
        self.set_current(Some(token.clone()));
        let result = transmit(self.transmitter.as_ref(), upload, token).await;
        self.set_current(None);

        let step = match result {
            Ok(receipt) => {
                tracing::debug!(id = %upload.id, message = %receipt.message, "upload completed");
                self.store.update_status(&upload.id, UploadStatus::Completed, None)?;
                summary.completed += 1;
                Step::Continue
            }
            Err(TransmitError::Cancelled) => {
                tracing::info!(id = %upload.id, "upload cancelled, returning to queue");
                self.store.revert_attempt(&upload.id, attempts_before)?;
                summary.requeued += 1;
                summary.cancelled = true;
                Step::Halt
            }
            Err(TransmitError::Unauthorized) => {
                tracing::warn!(id = %upload.id, "upload unauthorized, stopping pass");
                self.store.update_status(&upload.id, UploadStatus::Queued, None)?;
                summary.requeued += 1;
                summary.halted_unauthorized = true;
                Step::Halt
            }
            Err(TransmitError::Failed(message)) => {
                let delay = backoff_delay(self.config.base_delay, attempts_before);
                tracing::warn!(
                    id = %upload.id,
                    file = %upload.file_name,
                    error = %message,
                    delay_ms = delay.as_millis() as u64,
                    "upload failed"
                );
                self.store
                    .update_status(&upload.id, UploadStatus::Failed, Some(&message))?;
                summary.failed += 1;
                Step::Backoff(delay)
            }
        };
        self.bus.notify();
        Ok(step)
    }
}

/// The pending entry with the earliest `created_at`; the first one wins ties.
fn oldest(pending: Vec<QueuedUpload>) -> Option<QueuedUpload> {
    let mut iter = pending.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, next| {
        if next.created_at < best.created_at {
            next
        } else {
            best
        }
    }))
}

/// Clears pass state when a pass ends, including when its future is dropped.
struct PassGuard<'a> {
    processor: &'a QueueProcessor,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.processor.set_current(None);
        self.processor.processing.store(false, Ordering::SeqCst);
        self.processor.bus.notify();
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
