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

//! In-memory sync store implementation.
//!
//! ## Purpose
//! HashMap-based [`SyncStorage`] used in tests and runtimes without the
//! native engine. Configurable as read-only or notification-less to model
//! the restricted instance configurations the real engine produces (frozen
//! factory instances, encrypted instances without change callbacks).

use crate::{SyncResult, SyncStorage, SyncStoreError, ValueChangedHandle, ValueChangedListener};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use storelens_events::StorageValue;

type ListenerSlot = (u64, ValueChangedListener);

/// In-memory [`SyncStorage`] implementation with native-style value-changed
/// notifications.
///
/// ## Example
/// ```rust
/// use storelens_events::StorageValue;
/// use storelens_syncstore::{MemorySyncStorage, SyncStorage};
///
/// let store = MemorySyncStorage::new();
/// store.set("count", StorageValue::Number(42.0)).unwrap();
/// assert_eq!(store.get_number("count"), Some(42.0));
/// assert_eq!(store.get_string("count"), None); // typed getters do not coerce
/// ```
#[derive(Default)]
pub struct MemorySyncStorage {
    data: RwLock<HashMap<String, StorageValue>>,
    listeners: Arc<RwLock<Vec<ListenerSlot>>>,
    next_listener_id: AtomicU64,
    read_only: bool,
    notifications: bool,
}

impl MemorySyncStorage {
    /// Create an empty, writable store with change notifications enabled.
    pub fn new() -> Self {
        Self {
            notifications: true,
            ..Self::default()
        }
    }

    /// Create a store that rejects every write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            notifications: true,
            ..Self::default()
        }
    }

    /// Create a store whose `on_value_changed` reports unsupported, as
    /// encrypted or otherwise restricted instances do.
    pub fn without_change_notifications() -> Self {
        Self {
            notifications: false,
            ..Self::default()
        }
    }

    fn notify(&self, key: &str) {
        let snapshot: Vec<ValueChangedListener> = self
            .listeners
            .read()
            .expect("sync store listener lock poisoned")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(key);
        }
    }
}

impl SyncStorage for MemorySyncStorage {
    fn set(&self, key: &str, value: StorageValue) -> SyncResult<()> {
        if self.read_only {
            return Err(SyncStoreError::ReadOnly(key.to_string()));
        }
        self.data
            .write()
            .expect("sync store lock poisoned")
            .insert(key.to_string(), value);
        self.notify(key);
        Ok(())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.data.read().expect("sync store lock poisoned").get(key) {
            Some(StorageValue::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn get_number(&self, key: &str) -> Option<f64> {
        match self.data.read().expect("sync store lock poisoned").get(key) {
            Some(StorageValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    fn get_boolean(&self, key: &str) -> Option<bool> {
        match self.data.read().expect("sync store lock poisoned").get(key) {
            Some(StorageValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    fn get_buffer(&self, key: &str) -> Option<Vec<u8>> {
        match self.data.read().expect("sync store lock poisoned").get(key) {
            Some(StorageValue::Buffer(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn delete(&self, key: &str) -> SyncResult<()> {
        if self.read_only {
            return Err(SyncStoreError::ReadOnly(key.to_string()));
        }
        let removed = self
            .data
            .write()
            .expect("sync store lock poisoned")
            .remove(key)
            .is_some();
        if removed {
            self.notify(key);
        }
        Ok(())
    }

    fn clear_all(&self) -> SyncResult<()> {
        if self.read_only {
            return Err(SyncStoreError::ReadOnly("*".to_string()));
        }
        let keys: Vec<String> = {
            let mut data = self.data.write().expect("sync store lock poisoned");
            let keys = data.keys().cloned().collect();
            data.clear();
            keys
        };
        for key in &keys {
            self.notify(key);
        }
        Ok(())
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.data
            .read()
            .expect("sync store lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn contains(&self, key: &str) -> bool {
        self.data
            .read()
            .expect("sync store lock poisoned")
            .contains_key(key)
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn size(&self) -> usize {
        self.data.read().expect("sync store lock poisoned").len()
    }

    fn on_value_changed(&self, listener: ValueChangedListener) -> Option<ValueChangedHandle> {
        if !self.notifications {
            return None;
        }
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .expect("sync store listener lock poisoned")
            .push((id, listener));

        let listeners = Arc::clone(&self.listeners);
        Some(ValueChangedHandle::new(move || {
            listeners
                .write()
                .expect("sync store listener lock poisoned")
                .retain(|(listener_id, _)| *listener_id != id);
        }))
    }
}
