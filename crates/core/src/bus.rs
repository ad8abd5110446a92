// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change notification for the upload queue.
//!
//! The processor calls [`EventBus::notify`] whenever queue state changes;
//! observers re-read whatever they need. Listeners run synchronously, in
//! registration order, outside the registry lock, so a listener may itself
//! subscribe or unsubscribe.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registry of change listeners. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. It stays registered until
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invokes every listener in registration order.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    pub fn notify(&self) {
        let listeners: Vec<(u64, Listener)> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.listeners.clone()
        };

        for (id, listener) in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::warn!(listener = id, "queue listener panicked");
            }
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.lock().unwrap_or_else(|e| e.into_inner()).listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.listener_count()).finish()
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle does not unsubscribe.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
