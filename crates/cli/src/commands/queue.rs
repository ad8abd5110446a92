// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use ragq_core::{PassOutcome, PassSummary, Subscription, UploadQueue, UploadStatus, UploadSummary};

use crate::cli::{OutputFormat, QueueCommand};
use crate::display::{format_pass_summary, format_queue, format_queue_counts};
use crate::error::{Error, Result};
use crate::guard::InterruptGuard;
use crate::lock::QueueLock;

use super::{print_json, Context};

/// Execute a queue subcommand.
pub async fn run(ctx: &Context, cmd: QueueCommand) -> Result<()> {
    match cmd {
        QueueCommand::List { output } => list(ctx, output.output),
        QueueCommand::Process => process(ctx).await,
        QueueCommand::Retry => retry(ctx).await,
        QueueCommand::Remove { id } => remove(ctx, &id),
        QueueCommand::ClearCompleted => clear_completed(ctx),
    }
}

/// View over the store with a processor that cannot authenticate. Used by
/// commands that never start a pass.
fn offline_queue(ctx: &Context) -> Result<Arc<UploadQueue>> {
    let queue = ctx.open_queue(ctx.open_store()?, ctx.client()?);
    queue.refresh();
    Ok(queue)
}

fn list(ctx: &Context, output: OutputFormat) -> Result<()> {
    let entries = offline_queue(ctx)?.snapshot();
    match output {
        OutputFormat::Text => {
            println!("{}", format_queue(&entries));
            if !entries.is_empty() {
                println!("\n{}", format_queue_counts(&entries));
            }
        }
        OutputFormat::Json => print_json(&entries)?,
    }
    Ok(())
}

async fn process(ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    let _lock = QueueLock::try_acquire(&ctx.config.queue_lock_path()?)?;
    let queue = ctx.open_queue(ctx.open_store()?, client);
    let progress = Progress::attach(&queue);
    queue.mount();
    let summary = drain(&queue, progress).await;
    println!("{}", format_pass_summary(&summary));
    Ok(())
}

async fn retry(ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    let _lock = QueueLock::try_acquire(&ctx.config.queue_lock_path()?)?;
    let queue = ctx.open_queue(ctx.open_store()?, client);
    let progress = Progress::attach(&queue);
    let count = queue.retry_failed()?;
    if count == 0 {
        println!("No failed uploads to retry.");
    } else {
        println!("Requeued {} failed upload{}.", count, if count == 1 { "" } else { "s" });
    }
    let summary = drain(&queue, progress).await;
    println!("{}", format_pass_summary(&summary));
    Ok(())
}

fn remove(ctx: &Context, id: &str) -> Result<()> {
    let queue = offline_queue(ctx)?;
    let entry = resolve_id(&queue.snapshot(), id)?;
    // Holding the lock means no pass is running anywhere, so an `uploading`
    // entry was left by a crash.
    match QueueLock::try_acquire(&ctx.config.queue_lock_path()?) {
        Ok(_lock) => queue.remove_stale(&entry.id)?,
        Err(Error::QueueBusy) => queue.remove(&entry.id)?,
        Err(e) => return Err(e),
    }
    println!("Removed {} ({})", entry.file_name, entry.id);
    Ok(())
}

fn clear_completed(ctx: &Context) -> Result<()> {
    let removed = offline_queue(ctx)?.clear_completed()?;
    println!("Cleared {} completed upload{}.", removed, if removed == 1 { "" } else { "s" });
    Ok(())
}

/// Find the single entry whose id is `id` or starts with it.
pub fn resolve_id(entries: &[UploadSummary], id: &str) -> Result<UploadSummary> {
    if let Some(exact) = entries.iter().find(|e| e.id == id) {
        return Ok(exact.clone());
    }
    let matches: Vec<&UploadSummary> = entries.iter().filter(|e| e.id.starts_with(id)).collect();
    match matches.as_slice() {
        [] => Err(Error::UploadNotFound(id.to_string())),
        [single] => Ok((*single).clone()),
        many => Err(Error::AmbiguousId(id.to_string(), many.len())),
    }
}

/// Wait for every triggered pass while honoring Ctrl-C, then stop
/// following the queue.
pub async fn drain(queue: &Arc<UploadQueue>, progress: Progress) -> PassSummary {
    let _interrupts = InterruptGuard::install(Arc::clone(queue.processor()));
    let outcomes = queue.settle().await;
    progress.detach();
    queue.unmount();
    merge_outcomes(&outcomes)
}

/// Sum the passes that ran. Halt flags stick once any pass set them.
pub fn merge_outcomes(outcomes: &[PassOutcome]) -> PassSummary {
    outcomes
        .iter()
        .filter_map(PassOutcome::summary)
        .fold(PassSummary::default(), |mut acc, s| {
            acc.completed += s.completed;
            acc.failed += s.failed;
            acc.requeued += s.requeued;
            acc.halted_unauthorized |= s.halted_unauthorized;
            acc.cancelled |= s.cancelled;
            acc
        })
}

/// Prints one stderr line per status change seen while draining.
pub struct Progress {
    subscription: Subscription,
}

impl Progress {
    /// Start reporting changes relative to the store's current contents.
    pub fn attach(queue: &Arc<UploadQueue>) -> Self {
        queue.refresh();
        let seen: Mutex<HashMap<String, UploadStatus>> = Mutex::new(
            queue
                .snapshot()
                .into_iter()
                .map(|e| (e.id, e.status))
                .collect(),
        );
        let weak: Weak<UploadQueue> = Arc::downgrade(queue);
        let subscription = queue.subscribe(move || {
            let Some(queue) = weak.upgrade() else {
                return;
            };
            let mut seen = seen.lock().unwrap_or_else(|e| e.into_inner());
            for entry in queue.snapshot() {
                if seen.get(&entry.id) == Some(&entry.status) {
                    continue;
                }
                if let Some(line) = progress_line(&entry) {
                    eprintln!("{}", line);
                }
                seen.insert(entry.id, entry.status);
            }
        });
        Progress { subscription }
    }

    fn detach(self) {
        self.subscription.unsubscribe();
    }
}

/// Progress text for an entry that just reached `entry.status`.
pub fn progress_line(entry: &UploadSummary) -> Option<String> {
    match entry.status {
        UploadStatus::Uploading => Some(format!("uploading {}...", entry.file_name)),
        UploadStatus::Completed => Some(format!("uploaded {}", entry.file_name)),
        UploadStatus::Failed => Some(format!(
            "failed {}: {}",
            entry.file_name,
            entry.error_message.as_deref().unwrap_or("unknown error")
        )),
        UploadStatus::Queued => None,
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
