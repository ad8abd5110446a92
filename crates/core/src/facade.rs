// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observable view over the upload queue.
//!
//! [`UploadQueue`] keeps a sorted snapshot of the store, refreshed whenever
//! the processor announces a change, and exposes the user-facing actions:
//! enqueue, retry, remove, and clear. Every action that adds work triggers a
//! processing pass on the tokio runtime.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Weak};

use tokio::task::JoinHandle;

use crate::bus::{EventBus, Subscription};
use crate::error::{Error, Result};
use crate::processor::{PassOutcome, QueueProcessor};
use crate::store::UploadStore;
use crate::upload::{sort_for_display, FileType, NewUpload, UploadStatus, UploadSummary};

#[derive(Default)]
struct View {
    entries: Vec<UploadSummary>,
    /// Ids of the `completed` entries at the last observation.
    completed_seen: HashSet<String>,
}

fn completed_ids(entries: &[UploadSummary]) -> HashSet<String> {
    entries
        .iter()
        .filter(|e| e.status == UploadStatus::Completed)
        .map(|e| e.id.clone())
        .collect()
}

/// Sorted, self-refreshing view of the queue plus its actions.
pub struct UploadQueue {
    processor: Arc<QueueProcessor>,
    view: Mutex<View>,
    changes: EventBus,
    batch_complete: EventBus,
    subscription: Mutex<Option<Subscription>>,
    passes: Mutex<Vec<JoinHandle<PassOutcome>>>,
}

impl UploadQueue {
    /// Creates an unmounted view over `processor`'s store.
    pub fn new(processor: Arc<QueueProcessor>) -> Arc<Self> {
        Arc::new(UploadQueue {
            processor,
            view: Mutex::new(View::default()),
            changes: EventBus::new(),
            batch_complete: EventBus::new(),
            subscription: Mutex::new(None),
            passes: Mutex::new(Vec::new()),
        })
    }

    fn store(&self) -> &UploadStore {
        self.processor.store()
    }

    /// The processor this view drives.
    pub fn processor(&self) -> &Arc<QueueProcessor> {
        &self.processor
    }

    /// Load the snapshot, start following processor changes, and resume
    /// any work left from an earlier run.
    pub fn mount(self: &Arc<Self>) {
        self.refresh();
        {
            let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
            view.completed_seen = completed_ids(&view.entries);
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let subscription = self.processor.bus().subscribe(move || {
            if let Some(queue) = weak.upgrade() {
                queue.refresh();
            }
        });
        let previous = self
            .subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(subscription);
        if let Some(previous) = previous {
            previous.unsubscribe();
        }

        self.trigger();
    }

    /// Stop following processor changes. Passes already running continue.
    pub fn unmount(&self) {
        let subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    /// Re-read the store into the snapshot and notify view subscribers.
    ///
    /// A failed read leaves an empty snapshot.
    pub fn refresh(&self) {
        let mut entries = self.store().get_summaries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read upload queue");
            Vec::new()
        });
        sort_for_display(&mut entries);
        self.view.lock().unwrap_or_else(|e| e.into_inner()).entries = entries;
        self.changes.notify();
    }

    /// Entries sorted for display: uploading, queued, failed, completed;
    /// oldest first within each status.
    pub fn snapshot(&self) -> Vec<UploadSummary> {
        self.view.lock().unwrap_or_else(|e| e.into_inner()).entries.clone()
    }

    /// True while a processing pass is running.
    pub fn is_processing(&self) -> bool {
        self.processor.is_processing()
    }

    /// Persist files as new `queued` entries and start processing them.
    pub fn enqueue(
        self: &Arc<Self>,
        files: Vec<NewUpload>,
        file_type: FileType,
    ) -> Result<Vec<UploadSummary>> {
        let uploads = self.store().enqueue(files, file_type)?;
        tracing::info!(count = uploads.len(), file_type = %file_type, "files queued");
        self.refresh();
        self.trigger();
        Ok(uploads.iter().map(|u| u.summary()).collect())
    }

    /// Move every `failed` entry back to `queued` and start processing.
    ///
    /// `retry_count` is kept, so an entry that already used its attempts is
    /// failed again with "Max retries exceeded". Returns the number requeued.
    pub fn retry_failed(self: &Arc<Self>) -> Result<usize> {
        let failed: Vec<UploadSummary> = self
            .store()
            .get_summaries()?
            .into_iter()
            .filter(|e| e.status == UploadStatus::Failed)
            .collect();
        for entry in &failed {
            self.store().update_status(&entry.id, UploadStatus::Queued, None)?;
        }
        tracing::info!(count = failed.len(), "failed uploads requeued");
        self.refresh();
        self.trigger();
        Ok(failed.len())
    }

    /// Delete an entry. Refused while it is being transmitted.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.remove_entry(id, false)
    }

    /// Delete an entry, including one a crash left `uploading`.
    ///
    /// The caller must know no other instance is transmitting from this
    /// store. Still refused while this processor is running a pass.
    pub fn remove_stale(&self, id: &str) -> Result<()> {
        self.remove_entry(id, !self.is_processing())
    }

    fn remove_entry(&self, id: &str, allow_uploading: bool) -> Result<()> {
        let entry = self
            .store()
            .get(id)?
            .ok_or_else(|| Error::UploadNotFound(id.to_string()))?;
        if entry.status == UploadStatus::Uploading && !allow_uploading {
            return Err(Error::UploadInProgress(id.to_string()));
        }
        self.store().remove(id)?;
        tracing::debug!(id, status = %entry.status, "upload removed");
        self.refresh();
        Ok(())
    }

    /// Delete every `completed` entry. Returns the number removed.
    pub fn clear_completed(&self) -> Result<usize> {
        let removed = self.store().remove_completed()?;
        self.refresh();
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        view.completed_seen = completed_ids(&view.entries);
        Ok(removed)
    }

    /// Register a listener fired after a pass that completed new uploads.
    pub fn on_batch_complete<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.batch_complete.subscribe(listener)
    }

    /// Register a listener fired whenever the snapshot is refreshed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.changes.subscribe(listener)
    }

    /// Start a processing pass on the current tokio runtime.
    ///
    /// Does nothing outside a runtime. A pass that finds another one already
    /// running ends at once; the running pass drains the new work.
    pub fn trigger(self: &Arc<Self>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, upload queue not processed");
            return;
        };
        let queue = Arc::clone(self);
        let handle = runtime.spawn(async move {
            let outcome = queue.processor.process_queue().await;
            if matches!(outcome, PassOutcome::Finished(_)) {
                queue.after_pass();
            }
            outcome
        });
        self.passes.lock().unwrap_or_else(|e| e.into_inner()).push(handle);
    }

    fn after_pass(&self) {
        self.refresh();
        let fire = {
            let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
            let completed = completed_ids(&view.entries);
            let fresh = completed.iter().any(|id| !view.completed_seen.contains(id));
            view.completed_seen = completed;
            fresh
        };
        if fire {
            tracing::debug!("upload batch complete");
            self.batch_complete.notify();
        }
    }

    /// Wait for every triggered pass to finish. Returns their outcomes in
    /// trigger order.
    pub async fn settle(&self) -> Vec<PassOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let handles: Vec<JoinHandle<PassOutcome>> =
                std::mem::take(&mut *self.passes.lock().unwrap_or_else(|e| e.into_inner()));
            if handles.is_empty() {
                return outcomes;
            }
            for handle in handles {
                match handle.await {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => tracing::warn!(error = %e, "processing task failed"),
                }
            }
        }
    }
}

impl Drop for UploadQueue {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
