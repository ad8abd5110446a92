// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock serializing processing passes across `ragq` processes.
//!
//! Each process runs its own processor, and two processes draining the same
//! queue database could pick the same entry. The lock is held for the whole
//! pass and released when the guard drops.

use std::fs::{self, File};
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

/// Held exclusive lock on `queue.lock`.
#[derive(Debug)]
pub struct QueueLock {
    file: File,
}

impl QueueLock {
    /// Takes the lock without waiting. Returns [`Error::QueueBusy`] if another
    /// process holds it.
    pub fn try_acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        file.try_lock_exclusive().map_err(|_| Error::QueueBusy)?;
        tracing::debug!(path = %path.display(), "queue lock acquired");
        Ok(QueueLock { file })
    }
}

impl Drop for QueueLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
