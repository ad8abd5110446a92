// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `ragq upload`: persist files to the queue, then drain it.

use std::path::{Path, PathBuf};

use ragq_core::{FileType, NewUpload, UploadSummary};

use crate::display::{format_pass_summary, format_size, short_id};
use crate::error::{Error, Result};
use crate::lock::QueueLock;

use super::queue::{drain, Progress};
use super::Context;

/// Files read from disk, grouped by the endpoint they go to.
#[derive(Debug, Default)]
pub struct Batch {
    pub documents: Vec<NewUpload>,
    pub images: Vec<NewUpload>,
}

impl Batch {
    fn groups(self) -> impl Iterator<Item = (FileType, Vec<NewUpload>)> {
        [(FileType::Document, self.documents), (FileType::Image, self.images)]
            .into_iter()
            .filter(|(_, files)| !files.is_empty())
    }
}

/// The type for `path`: the explicit one, else inferred from the extension.
pub fn resolve_file_type(path: &Path, explicit: Option<FileType>) -> Result<FileType> {
    if let Some(file_type) = explicit {
        return Ok(file_type);
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    FileType::from_file_name(name).ok_or_else(|| Error::UnknownFileType(path.display().to_string()))
}

/// Read every path. Fails before anything is queued if one is unusable.
pub fn read_batch(paths: &[PathBuf], explicit: Option<FileType>) -> Result<Batch> {
    let mut batch = Batch::default();
    for path in paths {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let file_type = resolve_file_type(path, explicit)?;
        let upload = NewUpload::from_path(path)?;
        match file_type {
            FileType::Document => batch.documents.push(upload),
            FileType::Image => batch.images.push(upload),
        }
    }
    Ok(batch)
}

fn print_queued(entries: &[UploadSummary]) {
    for entry in entries {
        println!(
            "Queued {} ({}, {}) as {}",
            entry.file_name,
            entry.file_type,
            format_size(entry.size),
            short_id(&entry.id)
        );
    }
}

/// Why queued files are left for a later `ragq queue process`.
enum Deferred {
    Requested,
    NotLoggedIn,
    Busy,
}

pub async fn run(
    ctx: &Context,
    paths: &[PathBuf],
    file_type: Option<FileType>,
    no_wait: bool,
) -> Result<()> {
    let batch = read_batch(paths, file_type)?;
    let store = ctx.open_store()?;

    let mut deferred = no_wait.then_some(Deferred::Requested);
    let client = if no_wait {
        None
    } else {
        match ctx.authed_client() {
            Ok(client) => Some(client),
            Err(Error::NotLoggedIn) => {
                deferred = Some(Deferred::NotLoggedIn);
                None
            }
            Err(e) => return Err(e),
        }
    };
    let lock = match client {
        Some(_) => match QueueLock::try_acquire(&ctx.config.queue_lock_path()?) {
            Ok(lock) => Some(lock),
            Err(Error::QueueBusy) => {
                deferred = Some(Deferred::Busy);
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    let mut queued = Vec::new();
    for (file_type, files) in batch.groups() {
        queued.extend(store.enqueue(files, file_type)?.iter().map(|u| u.summary()));
    }
    tracing::info!(count = queued.len(), "files queued");
    print_queued(&queued);

    let (Some(client), Some(_lock)) = (client, lock) else {
        match deferred {
            Some(Deferred::NotLoggedIn) => eprintln!(
                "warning: not logged in, files left in the queue\n  hint: run 'ragq login' then 'ragq queue process'"
            ),
            Some(Deferred::Busy) => {
                println!("Another ragq process is uploading; it will pick these up.")
            }
            _ => println!("Run 'ragq queue process' to upload."),
        }
        return Ok(());
    };

    // One pass drains the new files along with anything left from earlier runs.
    let queue = ctx.open_queue(store, client);
    let progress = Progress::attach(&queue);
    queue.mount();
    let summary = drain(&queue, progress).await;
    println!("{}", format_pass_summary(&summary));
    Ok(())
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
