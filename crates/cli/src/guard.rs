// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ctrl-C handling while the upload queue is being processed.
//!
//! The first interrupt during a pass only warns, since leaving would
//! interrupt the transmission. A second interrupt cancels the in-flight
//! upload; it goes back to `queued` and the pass stops. With no pass running
//! the process exits with status 130.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ragq_core::QueueProcessor;
use tokio::task::JoinHandle;

/// Exit status for a process ended by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What to do about one interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    Exit,
    Warn,
    CancelCurrent,
}

/// Decide the action for an interrupt given whether work is in flight and
/// whether the user was already warned.
pub fn on_interrupt(in_flight: bool, warned: bool) -> InterruptAction {
    match (in_flight, warned) {
        (false, _) => InterruptAction::Exit,
        (true, false) => InterruptAction::Warn,
        (true, true) => InterruptAction::CancelCurrent,
    }
}

/// Watches for Ctrl-C until dropped.
pub struct InterruptGuard {
    task: JoinHandle<()>,
}

impl InterruptGuard {
    /// Install the handler on the current runtime.
    pub fn install(processor: Arc<QueueProcessor>) -> Self {
        let task = tokio::spawn(async move {
            let warned = AtomicBool::new(false);
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    return;
                }
                let action =
                    on_interrupt(processor.has_work_in_flight(), warned.load(Ordering::SeqCst));
                match action {
                    InterruptAction::Exit => std::process::exit(INTERRUPTED_EXIT_CODE),
                    InterruptAction::Warn => {
                        warned.store(true, Ordering::SeqCst);
                        eprintln!(
                            "warning: an upload is in progress\n  hint: press Ctrl-C again to cancel it; it stays queued"
                        );
                    }
                    InterruptAction::CancelCurrent => {
                        warned.store(false, Ordering::SeqCst);
                        if !processor.cancel_current() {
                            std::process::exit(INTERRUPTED_EXIT_CODE);
                        }
                    }
                }
            }
        });
        InterruptGuard { task }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
