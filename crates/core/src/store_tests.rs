// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::clock::ManualClock;
use chrono::TimeZone;
use std::collections::HashSet;
use tempfile::tempdir;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn store_with_clock() -> (UploadStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = UploadStore::open_in_memory().unwrap().with_clock(clock.clone());
    (store, clock)
}

fn pdf(name: &str) -> NewUpload {
    NewUpload::new(name, format!("%PDF {name}").into_bytes())
}

fn enqueue_one(store: &UploadStore, name: &str) -> QueuedUpload {
    store.enqueue(vec![pdf(name)], FileType::Document).unwrap().remove(0)
}

#[test]
fn enqueue_creates_one_queued_entry_per_file() {
    let (store, _clock) = store_with_clock();

    let created = store
        .enqueue(vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")], FileType::Document)
        .unwrap();

    assert_eq!(created.len(), 3);
    let ids: HashSet<&str> = created.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    for upload in &created {
        assert_eq!(upload.status, UploadStatus::Queued);
        assert_eq!(upload.retry_count, 0);
        assert_eq!(upload.file_type, FileType::Document);
        assert_eq!(upload.created_at, start_time());
        assert!(upload.error_message.is_none());
    }

    let all = store.get_all().unwrap();
    assert_eq!(all, created);
}

#[test]
fn enqueue_empty_batch_writes_nothing() {
    let (store, _clock) = store_with_clock();
    let created = store.enqueue(Vec::new(), FileType::Image).unwrap();
    assert!(created.is_empty());
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn get_all_preserves_payload_and_insertion_order() {
    let (store, clock) = store_with_clock();
    enqueue_one(&store, "first.pdf");
    clock.advance(chrono::Duration::seconds(1));
    store
        .enqueue(vec![NewUpload::new("second.png", vec![9, 8, 7])], FileType::Image)
        .unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all[0].file_name, "first.pdf");
    assert_eq!(all[1].file_name, "second.png");
    assert_eq!(all[1].payload, vec![9, 8, 7]);
    assert_eq!(all[1].content_type, "image/png");
}

#[test]
fn get_pending_returns_queued_and_uploading_only() {
    let (store, _clock) = store_with_clock();
    let queued = enqueue_one(&store, "queued.pdf");
    let uploading = enqueue_one(&store, "uploading.pdf");
    let completed = enqueue_one(&store, "completed.pdf");
    let failed = enqueue_one(&store, "failed.pdf");

    store.update_status(&uploading.id, UploadStatus::Uploading, None).unwrap();
    store.update_status(&completed.id, UploadStatus::Completed, None).unwrap();
    store.update_status(&failed.id, UploadStatus::Failed, Some("boom")).unwrap();

    let pending: Vec<String> = store.get_pending().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(pending, vec![queued.id, uploading.id]);
}

#[test]
fn entering_uploading_counts_an_attempt() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");

    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
    assert_eq!(store.get(&upload.id).unwrap().unwrap().retry_count, 1);

    // Re-marking an entry that is already uploading is not a new attempt
    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
    assert_eq!(store.get(&upload.id).unwrap().unwrap().retry_count, 1);

    store.update_status(&upload.id, UploadStatus::Queued, None).unwrap();
    assert_eq!(store.get(&upload.id).unwrap().unwrap().retry_count, 1);

    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
    assert_eq!(store.get(&upload.id).unwrap().unwrap().retry_count, 2);
}

#[test]
fn error_message_is_kept_only_while_failed() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");

    store.update_status(&upload.id, UploadStatus::Failed, Some("502 Bad Gateway")).unwrap();
    let failed = store.get(&upload.id).unwrap().unwrap();
    assert_eq!(failed.status, UploadStatus::Failed);
    assert_eq!(failed.error_message.as_deref(), Some("502 Bad Gateway"));

    store.update_status(&upload.id, UploadStatus::Queued, Some("ignored")).unwrap();
    let requeued = store.get(&upload.id).unwrap().unwrap();
    assert_eq!(requeued.status, UploadStatus::Queued);
    assert!(requeued.error_message.is_none());
}

#[test]
fn update_status_of_unknown_id_is_a_no_op() {
    let (store, _clock) = store_with_clock();
    enqueue_one(&store, "a.pdf");

    store.update_status("missing", UploadStatus::Completed, None).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, UploadStatus::Queued);
}

#[test]
fn revert_attempt_restores_retry_count() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");

    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
    store.revert_attempt(&upload.id, 0).unwrap();

    let reverted = store.get(&upload.id).unwrap().unwrap();
    assert_eq!(reverted.status, UploadStatus::Queued);
    assert_eq!(reverted.retry_count, 0);
}

#[test]
fn revert_attempt_never_raises_retry_count() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");
    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();

    store.revert_attempt(&upload.id, 5).unwrap();

    assert_eq!(store.get(&upload.id).unwrap().unwrap().retry_count, 1);
}

#[test]
fn revert_attempt_ignores_entries_not_uploading() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");
    store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
    store.update_status(&upload.id, UploadStatus::Completed, None).unwrap();

    store.revert_attempt(&upload.id, 0).unwrap();

    let entry = store.get(&upload.id).unwrap().unwrap();
    assert_eq!(entry.status, UploadStatus::Completed);
    assert_eq!(entry.retry_count, 1);
}

#[test]
fn remove_deletes_entry() {
    let (store, _clock) = store_with_clock();
    let upload = enqueue_one(&store, "a.pdf");

    assert!(store.remove(&upload.id).unwrap());
    assert!(store.get(&upload.id).unwrap().is_none());
    assert!(!store.remove(&upload.id).unwrap());
}

#[test]
fn remove_completed_leaves_other_statuses() {
    let (store, _clock) = store_with_clock();
    let done = enqueue_one(&store, "done.pdf");
    let waiting = enqueue_one(&store, "waiting.pdf");
    store.update_status(&done.id, UploadStatus::Completed, None).unwrap();

    assert_eq!(store.remove_completed().unwrap(), 1);

    let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![waiting.id]);
}

#[test]
fn cleanup_removes_completed_entries_older_than_an_hour() {
    let (store, clock) = store_with_clock();
    let old = enqueue_one(&store, "old.pdf");
    store.update_status(&old.id, UploadStatus::Completed, None).unwrap();

    clock.advance(chrono::Duration::minutes(61));

    assert_eq!(store.cleanup_old().unwrap(), 1);
    assert!(store.get(&old.id).unwrap().is_none());
}

#[test]
fn cleanup_keeps_recent_completed_entries() {
    let (store, clock) = store_with_clock();
    let recent = enqueue_one(&store, "recent.pdf");
    store.update_status(&recent.id, UploadStatus::Completed, None).unwrap();

    clock.advance(chrono::Duration::minutes(10));

    assert_eq!(store.cleanup_old().unwrap(), 0);
    assert!(store.get(&recent.id).unwrap().is_some());
}

#[test]
fn cleanup_keeps_unfinished_entries_younger_than_a_day() {
    let (store, clock) = store_with_clock();
    let queued = enqueue_one(&store, "queued.pdf");
    let failed = enqueue_one(&store, "failed.pdf");
    store.update_status(&failed.id, UploadStatus::Failed, Some("boom")).unwrap();

    clock.advance(chrono::Duration::hours(5));

    assert_eq!(store.cleanup_old().unwrap(), 0);
    assert!(store.get(&queued.id).unwrap().is_some());
    assert!(store.get(&failed.id).unwrap().is_some());
}

#[test]
fn cleanup_removes_any_entry_older_than_a_day() {
    let (store, clock) = store_with_clock();
    let queued = enqueue_one(&store, "queued.pdf");
    let failed = enqueue_one(&store, "failed.pdf");
    store.update_status(&failed.id, UploadStatus::Failed, Some("boom")).unwrap();

    clock.advance(chrono::Duration::hours(25));
    let fresh = enqueue_one(&store, "fresh.pdf");

    assert_eq!(store.cleanup_old().unwrap(), 2);
    let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![fresh.id]);
    assert!(store.get(&queued.id).unwrap().is_none());
}

#[test]
fn cleanup_honours_custom_retention() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = UploadStore::open_in_memory()
        .unwrap()
        .with_clock(clock.clone())
        .with_retention(Retention {
            completed_ttl: Duration::from_secs(60),
            stale_ttl: Duration::from_secs(600),
        });
    let done = enqueue_one(&store, "done.pdf");
    store.update_status(&done.id, UploadStatus::Completed, None).unwrap();

    clock.advance(chrono::Duration::minutes(2));

    assert_eq!(store.cleanup_old().unwrap(), 1);
}

#[test]
fn summaries_report_payload_size() {
    let (store, _clock) = store_with_clock();
    store
        .enqueue(vec![NewUpload::new("scan.png", vec![0; 128])], FileType::Image)
        .unwrap();

    let summaries = store.get_summaries().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].size, 128);
    assert_eq!(summaries[0].file_type, FileType::Image);
}

#[test]
fn entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("queue.db");

    let id = {
        let store = UploadStore::open(&path).unwrap();
        let upload = enqueue_one(&store, "a.pdf");
        store.update_status(&upload.id, UploadStatus::Uploading, None).unwrap();
        upload.id
    };

    let store = UploadStore::open(&path).unwrap();
    let pending = store.get_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);
    assert_eq!(pending[0].status, UploadStatus::Uploading);
    assert_eq!(pending[0].retry_count, 1);
}

#[test]
fn unavailable_store_degrades_to_empty_queue() {
    let store = UploadStore::unavailable();
    assert!(!store.is_available());

    assert!(store.get_all().unwrap().is_empty());
    assert!(store.get_pending().unwrap().is_empty());
    assert!(store.get_summaries().unwrap().is_empty());
    assert!(store.get("any").unwrap().is_none());
    store.update_status("any", UploadStatus::Failed, Some("x")).unwrap();
    store.revert_attempt("any", 0).unwrap();
    assert!(!store.remove("any").unwrap());
    assert_eq!(store.cleanup_old().unwrap(), 0);
}

#[test]
fn unavailable_store_rejects_new_work() {
    let store = UploadStore::unavailable();
    let err = store.enqueue(vec![pdf("a.pdf")], FileType::Document).unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));
}

#[test]
fn open_or_unavailable_falls_back_when_path_is_unusable() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let store = UploadStore::open_or_unavailable(&blocker.join("queue.db"));
    assert!(!store.is_available());
}
