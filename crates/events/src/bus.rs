// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Storelens.
//
// Storelens is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Storelens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Storelens. If not, see <https://www.gnu.org/licenses/>.

//! Synchronous listener bus.
//!
//! ## Purpose
//! Ordered fan-out of [`StorageEvent`]s to devtools subscribers, invoked
//! synchronously at the interception site.
//!
//! ## Design Decisions
//! - **Registration order**: subscribers are invoked in the order they were
//!   added; the same callback may be registered twice and fires twice.
//! - **Panic isolation**: each subscriber runs under `catch_unwind`; a failing
//!   subscriber is logged and skipped, never aborting delivery or reaching
//!   the storage call site.
//! - **Re-entrancy**: the subscriber list is snapshotted before delivery, so a
//!   subscriber may subscribe, unsubscribe, or trigger another storage call
//!   (and thus a nested `emit`) without deadlocking.
//! - **Zero-subscriber fast path**: `emit` returns immediately when empty, and
//!   [`ListenerBus::has_subscribers`] lets interceptors skip constructing the
//!   event (and running type detection) altogether.

use crate::event::StorageEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Boxed subscriber callback.
pub type SubscriberFn = Arc<dyn Fn(&StorageEvent) + Send + Sync + 'static>;

/// Identity of a registered subscriber, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    callback: SubscriberFn,
}

/// Ordered list of subscriber callbacks with add/remove/broadcast.
#[derive(Default)]
pub struct ListenerBus {
    subscribers: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl ListenerBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; it will receive every subsequent event.
    ///
    /// Duplicates are allowed: registering the same callback twice results in
    /// two deliveries per event, each removable by its own id.
    pub fn subscribe(
        &self,
        callback: impl Fn(&StorageEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .expect("listener bus lock poisoned")
            .push(Entry {
                id,
                callback: Arc::new(callback),
            });
        id
    }

    /// Register a subscriber on a shared bus, returning an owning guard.
    pub fn subscribe_on(
        bus: &Arc<ListenerBus>,
        callback: impl Fn(&StorageEvent) + Send + Sync + 'static,
    ) -> Subscription {
        Subscription {
            id: bus.subscribe(callback),
            bus: Some(Arc::clone(bus)),
        }
    }

    /// Remove a subscriber by id. Returns whether it was present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().expect("listener bus lock poisoned");
        let before = subscribers.len();
        subscribers.retain(|entry| entry.id != id);
        subscribers.len() != before
    }

    /// Drop all subscribers.
    pub fn clear(&self) {
        self.subscribers
            .write()
            .expect("listener bus lock poisoned")
            .clear();
    }

    /// Whether any subscriber is registered.
    pub fn has_subscribers(&self) -> bool {
        !self
            .subscribers
            .read()
            .expect("listener bus lock poisoned")
            .is_empty()
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("listener bus lock poisoned")
            .len()
    }

    /// Deliver `event` to every subscriber, in registration order.
    ///
    /// Returns immediately when no subscriber is registered.
    pub fn emit(&self, event: &StorageEvent) {
        // Snapshot under the lock, deliver outside it: subscribers may
        // re-enter the bus (subscribe, unsubscribe, nested emit).
        let snapshot: Vec<(SubscriptionId, SubscriberFn)> = {
            let subscribers = self.subscribers.read().expect("listener bus lock poisoned");
            if subscribers.is_empty() {
                return;
            }
            subscribers
                .iter()
                .map(|entry| (entry.id, Arc::clone(&entry.callback)))
                .collect()
        };

        for (id, callback) in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::warn!(
                    subscriber_id = id.0,
                    operation = %event.operation,
                    %reason,
                    "storage event subscriber panicked; continuing delivery"
                );
            }
        }
    }
}

impl std::fmt::Debug for ListenerBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII guard returned by [`ListenerBus::subscribe_on`].
///
/// Dropping the guard detaches the subscriber. Call
/// [`Subscription::forget`] to leave the subscriber registered for the
/// lifetime of the bus instead.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    bus: Option<Arc<ListenerBus>>,
}

impl Subscription {
    /// Identity of the underlying subscriber.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the subscriber from its bus now.
    pub fn unsubscribe(mut self) -> bool {
        match self.bus.take() {
            Some(bus) => bus.unsubscribe(self.id),
            None => false,
        }
    }

    /// Disarm the guard: the subscriber stays registered until the bus is
    /// cleared or [`ListenerBus::unsubscribe`] is called with [`id`](Self::id).
    pub fn forget(mut self) -> SubscriptionId {
        self.bus.take();
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.take() {
            bus.unsubscribe(self.id);
        }
    }
}
