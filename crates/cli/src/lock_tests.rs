// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_second_acquire_is_busy() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data").join("queue.lock");

    let held = QueueLock::try_acquire(&path).unwrap();
    let err = QueueLock::try_acquire(&path).unwrap_err();
    assert!(matches!(err, Error::QueueBusy));

    drop(held);
    QueueLock::try_acquire(&path).unwrap();
}

#[test]
fn test_acquire_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("queue.lock");

    let _lock = QueueLock::try_acquire(&path).unwrap();

    assert!(path.exists());
}
