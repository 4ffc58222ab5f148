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

//! Per-instance monitoring for the sync store.
//!
//! ## Purpose
//! Tracks which sync store instances are observed and combines the two
//! emission paths that together give complete coverage:
//!
//! 1. **Native path**: the instance's value-changed notification fires for
//!    any write or delete, including ones issued through references this
//!    layer never wrapped. It carries only the key, so the type detector
//!    recovers value and kind; a key no typed getter can read anymore was
//!    deleted, and is reported as a `Delete` event rather than a
//!    nonsensical typed `Set`.
//! 2. **Wrapper path**: [`MonitoredSyncStorage`] emits immediately-typed
//!    events for writes and is the only path that observes reads, which the
//!    native notification never fires for.
//!
//! A write through the wrapper is therefore observed twice. That duplication
//! is deliberate: each path alone is insufficient, and suppressing either
//! would trade completeness for tidiness. Subscribers that need uniqueness
//! can dedupe on (instance, key, timestamp).

use crate::{
    detect_value, InstanceInfo, InstanceRegistry, SyncResult, SyncStorage, ValueChangedHandle,
    ValueChangedListener,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use storelens_events::{
    IgnoredKeySet, ListenerBus, Operation, StorageEvent, StorageValue, ValueKind,
};

/// Registration metadata supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceOptions {
    /// Whether the instance is encrypted (metadata only; shown in the UI).
    pub encrypted: bool,
}

/// Monitoring lifecycle for sync store instances.
pub struct SyncStorageMonitor {
    registry: InstanceRegistry,
    bus: Arc<ListenerBus>,
    ignored: Arc<IgnoredKeySet>,
    native_handles: Mutex<HashMap<String, ValueChangedHandle>>,
}

impl SyncStorageMonitor {
    /// Create a monitor emitting to `bus`, filtered by `ignored`.
    pub fn new(bus: Arc<ListenerBus>, ignored: Arc<IgnoredKeySet>) -> Self {
        Self {
            registry: InstanceRegistry::new(),
            bus,
            ignored,
            native_handles: Mutex::new(HashMap::new()),
        }
    }

    /// Begin monitoring `handle` under `instance_id` and return the wrapper
    /// callers should route their storage traffic through.
    ///
    /// Idempotent: if `instance_id` is already tracked the call changes
    /// nothing (in particular, no second native listener is registered) and
    /// returns a wrapper over the originally registered handle. Instances
    /// without native change notifications are monitored wrap-only.
    pub fn add_instance(
        &self,
        instance_id: &str,
        handle: Arc<dyn SyncStorage>,
        options: InstanceOptions,
    ) -> MonitoredSyncStorage {
        if let Some(existing) = self.registry.get(instance_id) {
            tracing::debug!(instance_id, "instance already monitored, keeping first registration");
            return self.wrap(instance_id, existing.handle);
        }

        match handle.on_value_changed(self.native_listener(instance_id, &handle)) {
            Some(native) => {
                self.native_handles
                    .lock()
                    .expect("native handle lock poisoned")
                    .insert(instance_id.to_string(), native);
            }
            None => {
                tracing::debug!(
                    instance_id,
                    "change notifications unsupported, monitoring wrap-only"
                );
            }
        }

        self.registry.register(InstanceInfo {
            instance_id: instance_id.to_string(),
            handle: Arc::clone(&handle),
            encrypted: options.encrypted,
            read_only: handle.is_read_only(),
        });

        self.wrap(instance_id, handle)
    }

    /// Stop monitoring `instance_id`: unsubscribe the native listener (if
    /// one was registered) and forget the instance. No-op if untracked.
    /// Wrappers handed out earlier keep delegating but callers are expected
    /// to drop them and go back to the raw handle.
    pub fn remove_instance(&self, instance_id: &str) -> bool {
        if let Some(native) = self
            .native_handles
            .lock()
            .expect("native handle lock poisoned")
            .remove(instance_id)
        {
            native.remove();
        }
        let removed = self.registry.unregister(instance_id).is_some();
        if !removed {
            tracing::debug!(instance_id, "remove_instance on untracked instance");
        }
        removed
    }

    /// Whether `instance_id` is currently monitored.
    pub fn has_instance(&self, instance_id: &str) -> bool {
        self.registry.has(instance_id)
    }

    /// Ids of every monitored instance.
    pub fn monitored_instances(&self) -> Vec<String> {
        self.registry
            .get_all()
            .into_iter()
            .map(|info| info.instance_id)
            .collect()
    }

    /// Metadata for a monitored instance.
    pub fn instance(&self, instance_id: &str) -> Option<InstanceInfo> {
        self.registry.get(instance_id)
    }

    /// The underlying registry.
    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    fn wrap(&self, instance_id: &str, handle: Arc<dyn SyncStorage>) -> MonitoredSyncStorage {
        MonitoredSyncStorage {
            instance_id: instance_id.to_string(),
            inner: handle,
            bus: Arc::clone(&self.bus),
            ignored: Arc::clone(&self.ignored),
        }
    }

    /// Build the native value-changed callback for an instance.
    ///
    /// The callback holds the handle weakly; once the instance is dropped the
    /// notification quietly stops resolving instead of keeping it alive.
    fn native_listener(
        &self,
        instance_id: &str,
        handle: &Arc<dyn SyncStorage>,
    ) -> ValueChangedListener {
        let bus = Arc::clone(&self.bus);
        let ignored = Arc::clone(&self.ignored);
        let weak = Arc::downgrade(handle);
        let instance_id = instance_id.to_string();

        Arc::new(move |key: &str| {
            // Subscriber check first: with nobody listening, type detection
            // must not run at all.
            if !bus.has_subscribers() || ignored.should_ignore(key) {
                return;
            }
            let Some(handle) = weak.upgrade() else {
                return;
            };
            let detected = detect_value(handle.as_ref(), key);
            let event = match detected.kind {
                // Unreadable by every typed getter: the key was deleted.
                ValueKind::Unknown => {
                    StorageEvent::new(instance_id.as_str(), Operation::Delete).with_key(key)
                }
                kind => {
                    let mut event = StorageEvent::new(instance_id.as_str(), Operation::Set)
                        .with_key(key)
                        .with_value_type(kind);
                    if let Some(value) = detected.value {
                        event = event.with_value(value);
                    }
                    event
                }
            };
            bus.emit(&event);
        })
    }
}

impl std::fmt::Debug for SyncStorageMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncStorageMonitor")
            .field("instances", &self.registry.count())
            .finish()
    }
}

/// Monitoring wrapper around one sync store instance.
///
/// Writes emit immediately-typed events; the four typed reads emit `Get`
/// events with the read outcome. All calls delegate to the wrapped handle
/// with their original arguments and return its result untouched.
pub struct MonitoredSyncStorage {
    instance_id: String,
    inner: Arc<dyn SyncStorage>,
    bus: Arc<ListenerBus>,
    ignored: Arc<IgnoredKeySet>,
}

impl MonitoredSyncStorage {
    /// Id this wrapper reports in its events.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// The wrapped handle.
    pub fn inner(&self) -> &Arc<dyn SyncStorage> {
        &self.inner
    }

    fn observing(&self, key: &str) -> bool {
        self.bus.has_subscribers() && !self.ignored.should_ignore(key)
    }

    fn emit_get(&self, key: &str, kind: ValueKind, value: Option<StorageValue>) {
        let mut event = StorageEvent::new(self.instance_id.as_str(), Operation::Get)
            .with_key(key)
            .with_value_type(kind)
            .with_success(value.is_some());
        if let Some(value) = value {
            event = event.with_value(value);
        }
        self.bus.emit(&event);
    }
}

impl SyncStorage for MonitoredSyncStorage {
    fn set(&self, key: &str, value: StorageValue) -> SyncResult<()> {
        let observed = self.observing(key).then(|| {
            let kind = value.kind();
            let event_value = match &value {
                // Raw bytes never travel in events
                StorageValue::Buffer(bytes) => {
                    StorageValue::String(crate::buffer_placeholder(bytes.len()))
                }
                other => other.clone(),
            };
            (kind, event_value)
        });

        self.inner.set(key, value)?;

        if let Some((kind, event_value)) = observed {
            self.bus.emit(
                &StorageEvent::new(self.instance_id.as_str(), Operation::Set)
                    .with_key(key)
                    .with_value(event_value)
                    .with_value_type(kind),
            );
        }
        Ok(())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        let result = self.inner.get_string(key);
        if self.observing(key) {
            self.emit_get(
                key,
                ValueKind::String,
                result.clone().map(StorageValue::String),
            );
        }
        result
    }

    fn get_number(&self, key: &str) -> Option<f64> {
        let result = self.inner.get_number(key);
        if self.observing(key) {
            self.emit_get(key, ValueKind::Number, result.map(StorageValue::Number));
        }
        result
    }

    fn get_boolean(&self, key: &str) -> Option<bool> {
        let result = self.inner.get_boolean(key);
        if self.observing(key) {
            self.emit_get(key, ValueKind::Boolean, result.map(StorageValue::Boolean));
        }
        result
    }

    fn get_buffer(&self, key: &str) -> Option<Vec<u8>> {
        let result = self.inner.get_buffer(key);
        if self.observing(key) {
            self.emit_get(
                key,
                ValueKind::Buffer,
                result
                    .as_ref()
                    .map(|bytes| StorageValue::String(crate::buffer_placeholder(bytes.len()))),
            );
        }
        result
    }

    fn delete(&self, key: &str) -> SyncResult<()> {
        self.inner.delete(key)?;
        if self.observing(key) {
            self.bus.emit(
                &StorageEvent::new(self.instance_id.as_str(), Operation::Delete).with_key(key),
            );
        }
        Ok(())
    }

    fn clear_all(&self) -> SyncResult<()> {
        self.inner.clear_all()?;
        if self.bus.has_subscribers() {
            self.bus
                .emit(&StorageEvent::new(self.instance_id.as_str(), Operation::ClearAll));
        }
        Ok(())
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.inner.get_all_keys()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn on_value_changed(&self, listener: ValueChangedListener) -> Option<ValueChangedHandle> {
        self.inner.on_value_changed(listener)
    }
}
