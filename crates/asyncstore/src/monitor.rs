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

//! Interception wrapper for the async store.
//!
//! ## Purpose
//! Wraps an [`AsyncStorage`] so every write operation, while listening, emits
//! one classified [`StorageEvent`] to the listener bus before delegating to
//! the wrapped store with its original arguments.
//!
//! ## Design Decisions
//! - **Emit before await**: the event is emitted synchronously when the
//!   wrapped method is entered, before the inner future is awaited.
//!   Subscribers observe intent-to-write ahead of completion, which keeps the
//!   devtools UI responsive; this is a documented property of the layer, not
//!   an ordering bug.
//! - **Idempotent start/stop**: `start_listening` and `stop_listening` toggle
//!   an atomic flag; calling either twice in a row is a no-op. Since the
//!   wrapper never mutates the inner store's methods, stop leaves the store
//!   byte-for-byte in its original state.
//! - **Batch filtering**: for batch operations the ignored-key filter prunes
//!   the *event payload*; if nothing survives, the event is suppressed. The
//!   delegated call always receives the original, unfiltered argument list.

use crate::{AsyncStorage, StoreResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use storelens_events::{
    IgnoredKeySet, ListenerBus, Operation, StorageEvent, StorageValue, DEFAULT_INSTANCE_ID,
};

/// Transparent monitoring wrapper around an [`AsyncStorage`].
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use storelens_asyncstore::{AsyncStorage, MemoryAsyncStorage, MonitoredAsyncStorage};
/// use storelens_events::{IgnoredKeySet, ListenerBus};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bus = Arc::new(ListenerBus::new());
/// let store = MonitoredAsyncStorage::new(
///     MemoryAsyncStorage::new(),
///     Arc::clone(&bus),
///     Arc::new(IgnoredKeySet::with_defaults()),
/// );
///
/// bus.subscribe(|event| println!("{} {:?}", event.operation, event.key));
/// store.start_listening();
/// store.set_item("user.name", "Ann").await?;
/// # Ok(())
/// # }
/// ```
pub struct MonitoredAsyncStorage<S: AsyncStorage> {
    inner: S,
    bus: Arc<ListenerBus>,
    ignored: Arc<IgnoredKeySet>,
    listening: AtomicBool,
}

impl<S: AsyncStorage> MonitoredAsyncStorage<S> {
    /// Wrap `inner`, initially not listening.
    ///
    /// Wrap a store exactly once: the wrapper carries its own bus and flag,
    /// so wrapping an already-wrapped store would duplicate every event.
    pub fn new(inner: S, bus: Arc<ListenerBus>, ignored: Arc<IgnoredKeySet>) -> Self {
        Self {
            inner,
            bus,
            ignored,
            listening: AtomicBool::new(false),
        }
    }

    /// Begin emitting events for write operations. Idempotent.
    pub fn start_listening(&self) {
        if self.listening.swap(true, Ordering::SeqCst) {
            tracing::debug!("async store monitor already listening");
        }
    }

    /// Stop emitting events. Idempotent; never affects in-flight operations.
    pub fn stop_listening(&self) {
        if !self.listening.swap(false, Ordering::SeqCst) {
            tracing::debug!("async store monitor already stopped");
        }
    }

    /// Whether write operations currently emit events.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap, discarding the monitoring layer.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Fast-path check: skip event construction entirely unless we are
    /// listening and someone is subscribed.
    fn emitting(&self) -> bool {
        self.is_listening() && self.bus.has_subscribers()
    }

    fn emit_keyed(&self, operation: Operation, key: &str, value: Option<&str>) {
        if self.ignored.should_ignore(key) {
            return;
        }
        let mut event = StorageEvent::new(DEFAULT_INSTANCE_ID, operation).with_key(key);
        if let Some(value) = value {
            event = event.with_value(StorageValue::from(value));
        }
        self.bus.emit(&event);
    }

    fn emit_pairs(&self, operation: Operation, pairs: &[(String, String)]) {
        let observable: Vec<(String, String)> = pairs
            .iter()
            .filter(|(key, _)| !self.ignored.should_ignore(key))
            .cloned()
            .collect();
        if observable.is_empty() {
            return;
        }
        self.bus
            .emit(&StorageEvent::new(DEFAULT_INSTANCE_ID, operation).with_pairs(observable));
    }

    fn emit_keys(&self, operation: Operation, keys: &[String]) {
        let observable: Vec<String> = keys
            .iter()
            .filter(|key| !self.ignored.should_ignore(key))
            .cloned()
            .collect();
        if observable.is_empty() {
            return;
        }
        self.bus
            .emit(&StorageEvent::new(DEFAULT_INSTANCE_ID, operation).with_keys(observable));
    }
}

#[async_trait]
impl<S: AsyncStorage> AsyncStorage for MonitoredAsyncStorage<S> {
    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.emitting() {
            self.emit_keyed(Operation::Set, key, Some(value));
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> StoreResult<()> {
        if self.emitting() {
            self.emit_keyed(Operation::Remove, key, None);
        }
        self.inner.remove_item(key).await
    }

    async fn merge_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.emitting() {
            self.emit_keyed(Operation::Merge, key, Some(value));
        }
        self.inner.merge_item(key, value).await
    }

    async fn clear(&self) -> StoreResult<()> {
        if self.emitting() {
            self.bus
                .emit(&StorageEvent::new(DEFAULT_INSTANCE_ID, Operation::Clear));
        }
        self.inner.clear().await
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        if self.emitting() {
            self.emit_pairs(Operation::MultiSet, pairs);
        }
        self.inner.multi_set(pairs).await
    }

    async fn multi_remove(&self, keys: &[String]) -> StoreResult<()> {
        if self.emitting() {
            self.emit_keys(Operation::MultiRemove, keys);
        }
        self.inner.multi_remove(keys).await
    }

    async fn multi_merge(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        if self.emitting() {
            self.emit_pairs(Operation::MultiMerge, pairs);
        }
        self.inner.multi_merge(pairs).await
    }

    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        // Reads are not intercepted on this store
        self.inner.get_item(key).await
    }

    async fn get_all_keys(&self) -> StoreResult<Vec<String>> {
        self.inner.get_all_keys().await
    }
}
